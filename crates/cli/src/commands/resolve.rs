//! Resolve command implementation.
//!
//! Every name is declared as a list flag so multi-value and indexed lookups show all
//! of their values.

use anyhow::{Context, Result};
use flagenv::lookup::{self, LookupFn, with_indexed_lookup};
use flagenv::{FlagSet, Loader, StringList};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::formatters::{OutputFormat, ResolvedRow, get_formatter};

/// Indexed fallback settings from `--index-sep` and `--index-base`.
pub struct IndexOptions {
    pub sep: String,
    pub base: usize,
}

pub fn run(
    loader: Loader,
    dotenv: Option<&Path>,
    index: Option<IndexOptions>,
    names: &[String],
    output_format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(output_format)?;
    let formatter = get_formatter(format);

    let source: LookupFn = match dotenv {
        Some(path) => {
            info!("Reading values from {}", path.display());
            flagenv::source::dotenv_lookup(path)
                .with_context(|| format!("Failed to read values from {}", path.display()))?
        }
        None => Arc::new(lookup::env),
    };
    let source: LookupFn = match index {
        Some(IndexOptions { sep, base }) => {
            Arc::new(with_indexed_lookup(move |key: &str| source(key), sep, base))
        }
        None => source,
    };
    let loader = loader.with_lookup_fn(source);

    let mut flags = FlagSet::new("flagenv");
    for name in names {
        flags.define(name.clone(), StringList::new(), "");
    }
    loader
        .set_all(&mut flags)
        .context("Failed to resolve flag values")?;

    let rows: Vec<ResolvedRow> = names
        .iter()
        .map(|name| ResolvedRow {
            name: name.clone(),
            key: loader.key_for(name),
            values: flags
                .value::<StringList>(name)
                .map(|list| list.values().to_vec())
                .unwrap_or_default(),
        })
        .collect();

    print!("{}", formatter.format_resolved(&rows)?);
    Ok(())
}
