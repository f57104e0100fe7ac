//! Key functions: turn a flag name into a lookup key.
//!
//! Responsibilities:
//! - Provide the case converters (`snake_case`, `dot_case`, `kebab_case`, `path_like`).
//! - Provide decorators that wrap another key function (`uppercased`, `lowercased`,
//!   `with_prefix`).
//! - Derive the program prefix used by the default loader.
//!
//! Does NOT handle:
//! - Looking anything up (see `lookup.rs`).
//!
//! Invariants:
//! - Every key function is total and pure. An empty result means "this flag has no
//!   external key" and makes the loader skip the flag.
//! - Case converters never emit two separators in a row.

use std::sync::Arc;

/// A shareable key function.
pub type KeyFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Returns the name unchanged.
pub fn identity(name: &str) -> String {
    name.to_string()
}

fn is_alnum(ch: char) -> bool {
    ch.is_alphabetic() || ch.is_numeric()
}

/// Replace each run of characters rejected by `keep` with a single `sep`.
///
/// An empty name yields a lone separator.
fn separate(name: &str, sep: char, keep: impl Fn(char) -> bool) -> String {
    if name.is_empty() {
        return sep.to_string();
    }

    let mut out = String::with_capacity(name.len());
    let mut in_run = false;
    for ch in name.chars() {
        if keep(ch) {
            out.push(ch);
            in_run = false;
        } else if !in_run {
            out.push(sep);
            in_run = true;
        }
    }
    out
}

/// Converts a name to snake_case by replacing non-alphanumeric runs with `_`.
pub fn snake_case(name: &str) -> String {
    separate(name, '_', is_alnum)
}

/// Converts a name to dot.case by replacing non-alphanumeric runs with `.`.
/// Hyphens are preserved.
pub fn dot_case(name: &str) -> String {
    separate(name, '.', |ch| ch == '-' || is_alnum(ch))
}

/// Converts a name to kebab-case by replacing non-alphanumeric runs with `-`.
pub fn kebab_case(name: &str) -> String {
    separate(name, '-', is_alnum)
}

/// Converts a name to a slash-separated path, splitting on anything that is neither
/// alphanumeric nor a hyphen.
pub fn path_like(name: &str) -> String {
    name.split(|ch: char| ch != '-' && !is_alnum(ch))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Uppercases the output of `inner`.
pub fn uppercased<K>(inner: K) -> impl Fn(&str) -> String + Send + Sync + 'static
where
    K: Fn(&str) -> String + Send + Sync + 'static,
{
    move |name: &str| inner(name).to_uppercase()
}

/// Lowercases the output of `inner`.
pub fn lowercased<K>(inner: K) -> impl Fn(&str) -> String + Send + Sync + 'static
where
    K: Fn(&str) -> String + Send + Sync + 'static,
{
    move |name: &str| inner(name).to_lowercase()
}

/// Prepends `prefix` to the name before handing it to `inner`.
///
/// An empty name stays empty: a flag excluded before the prefix is applied must
/// not come back as a bare `prefix` key.
pub fn with_prefix<K>(
    prefix: impl Into<String>,
    inner: K,
) -> impl Fn(&str) -> String + Send + Sync + 'static
where
    K: Fn(&str) -> String + Send + Sync + 'static,
{
    let prefix = prefix.into();
    move |name: &str| {
        if name.is_empty() {
            return String::new();
        }
        let mut key = String::with_capacity(prefix.len() + name.len());
        key.push_str(&prefix);
        key.push_str(name);
        inner(&key)
    }
}

/// Builds an upper-case, underscore-terminated prefix from a program identifier.
///
/// The separator is always appended, so an identifier that already ends in one
/// yields a doubled `__`. An empty identifier yields a lone `_`. A leading digit
/// gets an extra `_` so the prefix is a valid identifier.
pub fn program_prefix(identifier: &str) -> String {
    if identifier.is_empty() {
        return "_".to_string();
    }
    let mut prefix = snake_case(identifier).to_uppercase();
    prefix.push('_');
    if prefix.starts_with(|ch: char| ch.is_ascii_digit()) {
        prefix.insert(0, '_');
    }
    prefix
}
