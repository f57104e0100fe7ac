//! File-backed sources for lookup functions.
//!
//! Responsibilities:
//! - Read `.env`-style files into a key -> values map.
//!
//! Does NOT handle:
//! - Modifying the process environment. Values stay in the returned map.
//!
//! Invariants:
//! - Repeated keys accumulate in file order instead of overwriting each other.
//! - Errors never include raw file contents, only the path and a position or I/O kind.

use std::collections::HashMap;
use std::path::Path;

use crate::error::SourceError;
use crate::lookup::{LookupFn, map_values};

/// Read a `.env` file into a map suitable for [`map_values`].
pub fn dotenv_values(path: impl AsRef<Path>) -> Result<HashMap<String, Vec<String>>, SourceError> {
    let path = path.as_ref();
    let iter = dotenvy::from_path_iter(path).map_err(|e| source_error(path, e))?;

    let mut values: HashMap<String, Vec<String>> = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| source_error(path, e))?;
        values.entry(key).or_default().push(value);
    }

    tracing::debug!(path = %path.display(), keys = values.len(), "loaded dotenv source");
    Ok(values)
}

/// Read a `.env` file and wrap it in a lookup function.
pub fn dotenv_lookup(path: impl AsRef<Path>) -> Result<LookupFn, SourceError> {
    Ok(std::sync::Arc::new(map_values(dotenv_values(path)?)))
}

fn source_error(path: &Path, error: dotenvy::Error) -> SourceError {
    let path = path.to_path_buf();
    match error {
        dotenvy::Error::LineParse(_, error_index) => SourceError::Parse { path, error_index },
        dotenvy::Error::Io(io_err) => SourceError::Io {
            path,
            kind: io_err.kind(),
        },
        _ => SourceError::Unknown { path },
    }
}
