//! Error types for flag loading.
//!
//! Responsibilities:
//! - Define error variants for flag-set parsing, value assignment, key lookup,
//!   file-backed sources, and the loader itself.
//! - Chain lower-level causes through `#[source]` so callers can print the full chain.
//!
//! Does NOT handle:
//! - Recovery or retry. Every error is returned to the caller as-is.
//!
//! Invariants:
//! - Loader errors name both the flag and the derived key.
//! - Looked-up values are never included in a message, since they may be secrets.
//!   The one exception is `FlagError::InvalidValue`, which echoes the rejected
//!   input the same way command-line parsers do.
//! - `SourceError` never includes raw file contents.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// A flag value rejected the string it was asked to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValueError {
    message: String,
}

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by [`FlagSet`](crate::FlagSet) while parsing arguments or setting values.
#[derive(Error, Debug)]
pub enum FlagError {
    #[error("flag provided but not defined: --{0}")]
    UnknownFlag(String),

    #[error("invalid value {value:?} for flag --{name}: {source}")]
    InvalidValue {
        name: String,
        value: String,
        #[source]
        source: ValueError,
    },

    /// The arguments did not match the declared flags.
    #[error(transparent)]
    Parse(#[from] clap::Error),
}

/// Errors raised by a lookup function while querying its backing store.
///
/// A missing key is not an error; lookups return an empty list instead.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("environment variable {key} is not valid unicode")]
    NotUnicode { key: String },

    #[error("lookup backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LookupError {
    /// Wrap an arbitrary store failure.
    pub fn backend<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LookupError::Backend(err.into())
    }
}

/// Errors raised while reading a file-backed source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// SAFETY: Only the byte index of the failure is kept, not the offending line.
    #[error("failed to parse {path} at position {error_index}")]
    Parse { path: PathBuf, error_index: usize },

    #[error("failed to read {path}: {kind}")]
    Io { path: PathBuf, kind: ErrorKind },

    #[error("failed to load {path}")]
    Unknown { path: PathBuf },
}

/// Errors returned by [`Loader`](crate::Loader) operations.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no lookup function defined")]
    NoLookup,

    #[error("error looking up {flag} config with key {key}")]
    Lookup {
        flag: String,
        key: String,
        #[source]
        source: LookupError,
    },

    #[error("unable to load {flag} config from key {key}")]
    Assign {
        flag: String,
        key: String,
        #[source]
        source: FlagError,
    },

    #[error("flag not found: {0}")]
    FlagNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_load_error_keeps_source_chain() {
        let err = LoadError::Lookup {
            flag: "Int".to_string(),
            key: "APP_INT".to_string(),
            source: LookupError::backend("connection reset"),
        };

        assert_eq!(
            err.to_string(),
            "error looking up Int config with key APP_INT"
        );
        let source = err.source().expect("lookup error should carry a source");
        assert_eq!(source.to_string(), "lookup backend failed: connection reset");
        assert_eq!(
            source.source().map(|e| e.to_string()),
            Some("connection reset".to_string())
        );
    }

    #[test]
    fn test_source_error_does_not_leak_contents() {
        let err = SourceError::Parse {
            path: PathBuf::from("app.env"),
            error_index: 12,
        };
        assert_eq!(err.to_string(), "failed to parse app.env at position 12");
    }

    #[test]
    fn test_invalid_value_names_flag_and_input() {
        let err = FlagError::InvalidValue {
            name: "Int".to_string(),
            value: "not-an-int".to_string(),
            source: ValueError::new("invalid digit found in string"),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"not-an-int\" for flag --Int: invalid digit found in string"
        );
    }
}
