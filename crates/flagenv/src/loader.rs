//! Loader: fill flags from a lookup function.
//!
//! Responsibilities:
//! - Derive a key per flag, look it up, and assign each value found.
//! - Offer the overwrite-all (`set_all`), fill-missing (`set_missing`), and single-flag
//!   (`set_one`) entry points.
//! - Provide preset loaders for environment variables and dot-separated stores, and the
//!   process-wide default loader keyed by the program name.
//!
//! Does NOT handle:
//! - Parsing command-line arguments (see `flag.rs`).
//! - Rolling back partial work. Values assigned before an error stay assigned.
//!
//! Invariants:
//! - A loader without a lookup function fails before touching any flag.
//! - Flags with an empty key, no values, or a merge-skip capability are left alone.
//! - The first error ends the pass and is the one returned.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::error::{LoadError, LookupError};
use crate::flag::FlagSet;
use crate::keys::{
    KeyFn, dot_case, identity, lowercased, program_prefix, snake_case, uppercased, with_prefix,
};
use crate::lookup::{LookupFn, env, with_indexed_lookup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergePolicy {
    Overwrite,
    FillMissing,
}

/// Loads flag values through a key function and a lookup function.
///
/// A loader holds no mutable state and can be shared between threads.
#[derive(Clone, Default)]
pub struct Loader {
    key: Option<KeyFn>,
    lookup: Option<LookupFn>,
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("key", &self.key.as_ref().map(|_| "<fn>"))
            .field("lookup", &self.lookup.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Loader {
    /// Create a loader with the identity key function and no lookup function.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader for environment variables named `{PREFIX}{NAME}` in upper snake case.
    ///
    /// A variable without a direct value falls back to `_1`, `_2`, ... suffixes.
    pub fn env(prefix: impl Into<String>) -> Self {
        Self::new()
            .with_key(uppercased(with_prefix(prefix, snake_case)))
            .with_lookup(with_indexed_lookup(env, "_", 1))
    }

    /// Loader for lower-case, dot-separated keys such as `app.max-retries`.
    ///
    /// A key without a direct value falls back to `-1`, `-2`, ... suffixes.
    pub fn dot<L>(prefix: impl Into<String>, lookup: L) -> Self
    where
        L: Fn(&str) -> Result<Vec<String>, LookupError> + Send + Sync + 'static,
    {
        Self::new()
            .with_key(lowercased(with_prefix(prefix, dot_case)))
            .with_lookup(with_indexed_lookup(lookup, "-", 1))
    }

    /// Environment loader using [`default_prefix`].
    pub fn default_env() -> Self {
        Self::env(default_prefix())
    }

    pub fn with_key<K>(mut self, key: K) -> Self
    where
        K: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.key = Some(Arc::new(key));
        self
    }

    pub fn with_lookup<L>(mut self, lookup: L) -> Self
    where
        L: Fn(&str) -> Result<Vec<String>, LookupError> + Send + Sync + 'static,
    {
        self.lookup = Some(Arc::new(lookup));
        self
    }

    /// Use an already shared lookup function.
    pub fn with_lookup_fn(mut self, lookup: LookupFn) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// The key this loader derives for a flag name.
    pub fn key_for(&self, name: &str) -> String {
        match &self.key {
            Some(key) => key(name),
            None => identity(name),
        }
    }

    /// Set every flag the lookup has values for, overwriting whatever it holds.
    ///
    /// Flags whose value reports `skip_merge() == true` are ignored.
    pub fn set_all(&self, flags: &mut FlagSet) -> Result<(), LoadError> {
        self.set_flags(flags, MergePolicy::Overwrite)
    }

    /// Set only the flags that have not been explicitly set yet.
    ///
    /// Flags whose value reports `skip_merge() == true` are ignored.
    pub fn set_missing(&self, flags: &mut FlagSet) -> Result<(), LoadError> {
        self.set_flags(flags, MergePolicy::FillMissing)
    }

    /// Set a single flag by name. The merge-skip capability does not apply here.
    pub fn set_one(&self, flags: &mut FlagSet, name: &str) -> Result<(), LoadError> {
        if flags.lookup(name).is_none() {
            return Err(LoadError::FlagNotFound(name.to_string()));
        }
        let lookup = self.lookup.as_ref().ok_or(LoadError::NoLookup)?;
        self.set_flag(flags, lookup, name)
    }

    fn set_flags(&self, flags: &mut FlagSet, policy: MergePolicy) -> Result<(), LoadError> {
        let lookup = self.lookup.as_ref().ok_or(LoadError::NoLookup)?;

        let visited: BTreeSet<String> = match policy {
            MergePolicy::FillMissing => flags.visit().map(|f| f.name().to_string()).collect(),
            MergePolicy::Overwrite => BTreeSet::new(),
        };

        let pending: Vec<String> = flags
            .visit_all()
            .filter(|flag| {
                if visited.contains(flag.name()) {
                    tracing::debug!(flag = flag.name(), "skipping explicitly set flag");
                    return false;
                }
                if flag.skips_merge() {
                    tracing::debug!(flag = flag.name(), "skipping flag that opts out of merge");
                    return false;
                }
                true
            })
            .map(|flag| flag.name().to_string())
            .collect();

        for name in &pending {
            self.set_flag(flags, lookup, name)?;
        }
        Ok(())
    }

    fn set_flag(
        &self,
        flags: &mut FlagSet,
        lookup: &LookupFn,
        name: &str,
    ) -> Result<(), LoadError> {
        let key = self.key_for(name);
        if key.is_empty() {
            tracing::debug!(flag = name, "flag has no key");
            return Ok(());
        }

        let values = lookup(&key).map_err(|source| LoadError::Lookup {
            flag: name.to_string(),
            key: key.clone(),
            source,
        })?;
        tracing::debug!(flag = name, key = %key, count = values.len(), "looked up flag");

        for value in &values {
            flags.set(name, value).map_err(|source| LoadError::Assign {
                flag: name.to_string(),
                key: key.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// The default prefix: the upper snake case form of the program's file name.
pub fn default_prefix() -> String {
    let program = std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    program_prefix(&program)
}

static DEFAULT_LOADER: LazyLock<Loader> = LazyLock::new(Loader::default_env);

/// The process-wide loader behind [`set_all`], [`set_missing`], and [`set_one`].
///
/// Built on first use from the program name at that time.
pub fn default_loader() -> &'static Loader {
    &DEFAULT_LOADER
}

/// [`Loader::set_all`] with the default loader.
pub fn set_all(flags: &mut FlagSet) -> Result<(), LoadError> {
    default_loader().set_all(flags)
}

/// [`Loader::set_missing`] with the default loader.
pub fn set_missing(flags: &mut FlagSet) -> Result<(), LoadError> {
    default_loader().set_missing(flags)
}

/// [`Loader::set_one`] with the default loader.
pub fn set_one(flags: &mut FlagSet, name: &str) -> Result<(), LoadError> {
    default_loader().set_one(flags, name)
}
