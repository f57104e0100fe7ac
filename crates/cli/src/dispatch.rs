//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//! - Build the key-only loader shared by every command.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).

use anyhow::Result;
use flagenv::Loader;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::commands::resolve::IndexOptions;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<()> {
    let loader = Loader::new().with_key(cli.key_fn());

    match cli.command {
        Commands::Keys { names } => commands::keys::run(&loader, &names, &cli.output),
        Commands::Resolve {
            dotenv,
            index_sep,
            index_base,
            names,
        } => {
            let index = index_sep.map(|sep| IndexOptions {
                sep,
                base: index_base,
            });
            commands::resolve::run(loader, dotenv.as_deref(), index, &names, &cli.output)
        }
    }
}
