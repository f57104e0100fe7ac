//! Keys command implementation.

use anyhow::Result;
use flagenv::Loader;

use crate::formatters::{KeyRow, OutputFormat, get_formatter};

pub fn run(loader: &Loader, names: &[String], output_format: &str) -> Result<()> {
    let format = OutputFormat::parse(output_format)?;
    let formatter = get_formatter(format);

    let rows: Vec<KeyRow> = names
        .iter()
        .map(|name| KeyRow {
            name: name.clone(),
            key: loader.key_for(name),
        })
        .collect();

    print!("{}", formatter.format_keys(&rows)?);
    Ok(())
}
