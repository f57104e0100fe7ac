//! Lookup functions: resolve a key to zero or more values.
//!
//! Responsibilities:
//! - Read single values from the process environment or from in-memory maps.
//! - Read multiple values from a map of lists.
//! - Fall back to indexed keys (`KEY_1`, `KEY_2`, ...) when a key has no direct value.
//!
//! Does NOT handle:
//! - Parsing files into maps (see `source.rs`).
//! - Deciding which key to look up (see `keys.rs`).
//!
//! Invariants:
//! - A missing key yields an empty list, never an error.
//! - Lookups never mutate their backing store.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LookupError;

/// A shareable lookup function.
pub type LookupFn = Arc<dyn Fn(&str) -> Result<Vec<String>, LookupError> + Send + Sync>;

/// Looks up the environment variable named `key`.
///
/// An unset variable yields no values. A variable holding non-unicode data is an error
/// rather than being silently dropped.
pub fn env(key: &str) -> Result<Vec<String>, LookupError> {
    match std::env::var(key) {
        Ok(value) => Ok(vec![value]),
        Err(std::env::VarError::NotPresent) => Ok(Vec::new()),
        Err(std::env::VarError::NotUnicode(_)) => Err(LookupError::NotUnicode {
            key: key.to_string(),
        }),
    }
}

/// Looks up a single value per key in a map of strings.
pub fn map_value(
    map: HashMap<String, String>,
) -> impl Fn(&str) -> Result<Vec<String>, LookupError> + Send + Sync + 'static {
    move |key: &str| Ok(map.get(key).cloned().into_iter().collect())
}

/// Looks up a list of values per key in a map of string lists.
pub fn map_values(
    map: HashMap<String, Vec<String>>,
) -> impl Fn(&str) -> Result<Vec<String>, LookupError> + Send + Sync + 'static {
    move |key: &str| Ok(map.get(key).cloned().unwrap_or_default())
}

/// Falls back to indexed keys when `key` itself has no values.
///
/// With `sep = "_"` and `base = 1`, a miss on `STR` probes `STR_1`, `STR_2`, and so on,
/// collecting every value until the first index with no values. Indices past a gap are
/// never consulted.
///
/// ```
/// use std::collections::HashMap;
/// use flagenv::lookup::{map_value, with_indexed_lookup};
///
/// let map = HashMap::from([
///     ("STR_1".to_string(), "a".to_string()),
///     ("STR_2".to_string(), "b".to_string()),
///     ("STR_4".to_string(), "skipped".to_string()),
/// ]);
/// let lookup = with_indexed_lookup(map_value(map), "_", 1);
/// assert_eq!(lookup("STR").unwrap(), vec!["a", "b"]);
/// ```
pub fn with_indexed_lookup<L>(
    inner: L,
    sep: impl Into<String>,
    base: usize,
) -> impl Fn(&str) -> Result<Vec<String>, LookupError> + Send + Sync + 'static
where
    L: Fn(&str) -> Result<Vec<String>, LookupError> + Send + Sync + 'static,
{
    let sep = sep.into();
    move |key: &str| {
        let mut values = inner(key)?;
        if !values.is_empty() {
            return Ok(values);
        }

        let prefix = format!("{key}{sep}");
        for index in base..=usize::MAX {
            let indexed_key = format!("{prefix}{index}");
            let found = inner(&indexed_key)?;
            tracing::trace!(key = %indexed_key, count = found.len(), "indexed lookup");
            if found.is_empty() {
                break;
            }
            values.extend(found);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Mutex;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn single_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    #[serial]
    fn test_env_lookup() {
        temp_env::with_vars(
            [
                ("_FLAGENV_TEST_SET", Some("value")),
                ("_FLAGENV_TEST_UNSET", None),
            ],
            || {
                assert_eq!(env("_FLAGENV_TEST_SET").unwrap(), strings(&["value"]));
                assert!(env("_FLAGENV_TEST_UNSET").unwrap().is_empty());
            },
        );
    }

    #[test]
    #[serial]
    fn test_env_lookup_keeps_empty_value() {
        temp_env::with_var("_FLAGENV_TEST_EMPTY", Some(""), || {
            assert_eq!(env("_FLAGENV_TEST_EMPTY").unwrap(), strings(&[""]));
        });
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_env_lookup_rejects_non_unicode() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(&[0x66, 0x6f, 0x80]);
        temp_env::with_var("_FLAGENV_TEST_BYTES", Some(raw), || {
            let err = env("_FLAGENV_TEST_BYTES").unwrap_err();
            assert!(matches!(err, LookupError::NotUnicode { ref key } if key == "_FLAGENV_TEST_BYTES"));
        });
    }

    #[test]
    fn test_map_value() {
        let lookup = map_value(single_map(&[("Int", "1234")]));
        assert_eq!(lookup("Int").unwrap(), strings(&["1234"]));
        assert!(lookup("Missing").unwrap().is_empty());
    }

    #[test]
    fn test_map_values() {
        let map = HashMap::from([("Strs".to_string(), strings(&["1", "2", "3"]))]);
        let lookup = map_values(map);
        assert_eq!(lookup("Strs").unwrap(), strings(&["1", "2", "3"]));
        assert!(lookup("Missing").unwrap().is_empty());
    }

    #[test]
    fn test_indexed_lookup_stops_at_gap() {
        let map = single_map(&[
            ("Strs.1", "Hello"),
            ("Strs.2", "World"),
            ("Strs.3", "!"),
            ("Strs.5", "Ignored"),
        ]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let inner = map_value(map);
        let log = seen.clone();
        let lookup = with_indexed_lookup(
            move |key: &str| {
                log.lock().unwrap().push(key.to_string());
                inner(key)
            },
            ".",
            1,
        );

        assert_eq!(lookup("Strs").unwrap(), strings(&["Hello", "World", "!"]));
        assert_eq!(
            *seen.lock().unwrap(),
            strings(&["Strs", "Strs.1", "Strs.2", "Strs.3", "Strs.4"])
        );
    }

    #[test]
    fn test_indexed_lookup_direct_hit_short_circuits() {
        let map = single_map(&[("APP_STRS", "x"), ("APP_STRS_1", "ignored")]);
        let lookup = with_indexed_lookup(map_value(map), "_", 1);
        assert_eq!(lookup("APP_STRS").unwrap(), strings(&["x"]));
    }

    #[test]
    fn test_indexed_lookup_base_zero() {
        let map = single_map(&[("app-strs-0", "x"), ("app-strs-1", "y")]);
        let lookup = with_indexed_lookup(map_value(map), "-", 0);
        assert_eq!(lookup("app-strs").unwrap(), strings(&["x", "y"]));
    }

    #[test]
    fn test_indexed_lookup_missing_everywhere() {
        let lookup = with_indexed_lookup(map_value(HashMap::new()), "_", 1);
        assert!(lookup("NOPE").unwrap().is_empty());
    }

    #[test]
    fn test_indexed_lookup_flattens_multi_values() {
        let map = HashMap::from([
            ("k-1".to_string(), strings(&["a", "b"])),
            ("k-2".to_string(), strings(&["c"])),
        ]);
        let lookup = with_indexed_lookup(map_values(map), "-", 1);
        assert_eq!(lookup("k").unwrap(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_indexed_lookup_propagates_direct_error() {
        let lookup = with_indexed_lookup(
            |_: &str| Err(LookupError::backend("test error")),
            "_",
            1,
        );
        let err = lookup("KEY").unwrap_err();
        assert_eq!(err.to_string(), "lookup backend failed: test error");
    }

    #[test]
    fn test_indexed_lookup_propagates_indexed_error() {
        let lookup = with_indexed_lookup(
            |key: &str| {
                if key.ends_with("_1") {
                    Err(LookupError::backend("test error"))
                } else {
                    Ok(Vec::new())
                }
            },
            "_",
            1,
        );
        assert!(matches!(lookup("KEY"), Err(LookupError::Backend(_))));
    }
}
