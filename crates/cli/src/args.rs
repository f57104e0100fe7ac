//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Turn the key options into a `flagenv` key function.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `commands` module).

use clap::{Parser, Subcommand};
use flagenv::keys;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flagenv")]
#[command(about = "Show how flag names map to config keys and what values they resolve to", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  flagenv keys max-retries tls.cert\n  flagenv --prefix myapp_ resolve max-retries peer\n  flagenv --case dot --fold lower --prefix app. resolve --dotenv app.env --index-sep - peer\n"
)]
pub struct Cli {
    /// Case style used to turn a flag name into a key
    #[arg(long, global = true, value_enum, default_value_t = KeyCase::Snake, env = "FLAGENV_CASE")]
    pub case: KeyCase,

    /// Case folding applied to the finished key
    #[arg(long, global = true, value_enum, default_value_t = Fold::Upper, env = "FLAGENV_FOLD")]
    pub fold: Fold,

    /// Literal prefix prepended to every flag name before conversion (e.g., myapp_)
    #[arg(long, global = true, env = "FLAGENV_PREFIX")]
    pub prefix: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the key derived for each flag name
    Keys {
        /// Flag names to convert
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Resolve values for each flag name from the environment or a .env file
    Resolve {
        /// Read values from this .env file instead of the process environment
        #[arg(long, value_name = "FILE")]
        dotenv: Option<PathBuf>,

        /// Separator for indexed fallback keys (e.g., "_" probes KEY_1, KEY_2, ...)
        #[arg(long)]
        index_sep: Option<String>,

        /// First index probed by the indexed fallback
        #[arg(long, default_value_t = 1, requires = "index_sep")]
        index_base: usize,

        /// Flag names to resolve
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Key case styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KeyCase {
    /// Keep the name unchanged
    Identity,
    /// Separate words with `_`
    Snake,
    /// Separate words with `.`, keeping hyphens
    Dot,
    /// Separate words with `-`
    Kebab,
    /// Separate words with `/`
    Path,
}

/// Case folding for finished keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Fold {
    Upper,
    Lower,
    None,
}

type BoxedKeyFn = Box<dyn Fn(&str) -> String + Send + Sync>;

impl Cli {
    /// Build the key function described by `--case`, `--prefix`, and `--fold`.
    pub fn key_fn(&self) -> BoxedKeyFn {
        let base: BoxedKeyFn = match self.case {
            KeyCase::Identity => Box::new(keys::identity),
            KeyCase::Snake => Box::new(keys::snake_case),
            KeyCase::Dot => Box::new(keys::dot_case),
            KeyCase::Kebab => Box::new(keys::kebab_case),
            KeyCase::Path => Box::new(keys::path_like),
        };

        let prefixed: BoxedKeyFn = match &self.prefix {
            Some(prefix) if !prefix.is_empty() => Box::new(keys::with_prefix(prefix.clone(), base)),
            _ => base,
        };

        match self.fold {
            Fold::Upper => Box::new(keys::uppercased(prefixed)),
            Fold::Lower => Box::new(keys::lowercased(prefixed)),
            Fold::None => prefixed,
        }
    }
}
