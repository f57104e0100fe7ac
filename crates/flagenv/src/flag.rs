//! Flag declarations and command-line parsing.
//!
//! Responsibilities:
//! - Hold a set of named flags, each owning a [`FlagValue`].
//! - Parse `--name=value` style arguments into those flags through a `clap::Command`.
//! - Track which flags were explicitly set, for fill-missing loading.
//!
//! Does NOT handle:
//! - Reading values from the environment or files (see `loader.rs`).
//!
//! Invariants:
//! - Flags are enumerated in lexicographic name order.
//! - Every successful `set` marks the flag as explicitly set, including sets made by a
//!   loader.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use crate::error::{FlagError, ValueError};

/// A value that can be assigned from a string.
pub trait FlagValue: Any + Send {
    /// Parse `value` and store it.
    fn set(&mut self, value: &str) -> Result<(), ValueError>;

    /// The current value as a string.
    fn current(&self) -> String;

    /// Whether a bare `-name` means `-name=true`.
    fn is_bool_flag(&self) -> bool {
        false
    }

    /// The merge-skip capability, if this value has one.
    ///
    /// Values that implement [`SkipMerge`] must override this to return `Some(self)`;
    /// the loader only sees the capability through this accessor.
    fn merge_skipper(&self) -> Option<&dyn SkipMerge> {
        None
    }
}

/// Lets a flag value opt out of bulk loading.
///
/// Implementing this trait alone has no effect. The value must also expose it from
/// [`FlagValue::merge_skipper`]:
///
/// ```
/// use flagenv::{FlagValue, SkipMerge, ValueError};
///
/// struct Secret(String);
///
/// impl SkipMerge for Secret {
///     fn skip_merge(&self) -> bool {
///         true
///     }
/// }
///
/// impl FlagValue for Secret {
///     fn set(&mut self, value: &str) -> Result<(), ValueError> {
///         self.0 = value.to_string();
///         Ok(())
///     }
///
///     fn current(&self) -> String {
///         String::new()
///     }
///
///     fn merge_skipper(&self) -> Option<&dyn SkipMerge> {
///         Some(self)
///     }
/// }
///
/// let mut flags = flagenv::FlagSet::new("demo");
/// flags.define("token", Secret(String::new()), "api token");
/// assert!(flags.lookup("token").unwrap().skips_merge());
/// ```
pub trait SkipMerge {
    fn skip_merge(&self) -> bool;
}

/// A single overwriting value parsed with [`FromStr`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scalar<T>(T);

impl<T> Scalar<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn get(&self) -> &T {
        &self.0
    }
}

impl<T> FlagValue for Scalar<T>
where
    T: FromStr + fmt::Display + Send + 'static,
    T::Err: fmt::Display,
{
    fn set(&mut self, value: &str) -> Result<(), ValueError> {
        self.0 = value
            .parse()
            .map_err(|e: T::Err| ValueError::new(e.to_string()))?;
        Ok(())
    }

    fn current(&self) -> String {
        self.0.to_string()
    }
}

/// A boolean switch. Accepts `1`, `t`, `true`, `0`, `f`, `false` in any case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bool(bool);

impl Bool {
    pub fn new(value: bool) -> Self {
        Self(value)
    }

    pub fn get(&self) -> bool {
        self.0
    }
}

impl FlagValue for Bool {
    fn set(&mut self, value: &str) -> Result<(), ValueError> {
        self.0 = match value.to_ascii_lowercase().as_str() {
            "1" | "t" | "true" => true,
            "0" | "f" | "false" => false,
            _ => return Err(ValueError::new(format!("invalid boolean {value:?}"))),
        };
        Ok(())
    }

    fn current(&self) -> String {
        self.0.to_string()
    }

    fn is_bool_flag(&self) -> bool {
        true
    }
}

/// Appends every assigned value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(Vec<String>);

impl StringList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}

impl FlagValue for StringList {
    fn set(&mut self, value: &str) -> Result<(), ValueError> {
        self.0.push(value.to_string());
        Ok(())
    }

    fn current(&self) -> String {
        self.0.join(",")
    }
}

/// Wraps a value so bulk loading leaves it alone.
///
/// The flag can still be set from the command line or with `Loader::set_one`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pinned<V>(V);

impl<V> Pinned<V> {
    pub fn new(inner: V) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> &V {
        &self.0
    }
}

impl<V: FlagValue> FlagValue for Pinned<V> {
    fn set(&mut self, value: &str) -> Result<(), ValueError> {
        self.0.set(value)
    }

    fn current(&self) -> String {
        self.0.current()
    }

    fn is_bool_flag(&self) -> bool {
        self.0.is_bool_flag()
    }

    fn merge_skipper(&self) -> Option<&dyn SkipMerge> {
        Some(self)
    }
}

impl<V> SkipMerge for Pinned<V> {
    fn skip_merge(&self) -> bool {
        true
    }
}

/// A declared flag.
pub struct Flag {
    name: String,
    usage: String,
    default_value: String,
    value: Box<dyn FlagValue>,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value's string form at declaration time.
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn value(&self) -> &dyn FlagValue {
        self.value.as_ref()
    }

    pub fn current(&self) -> String {
        self.value.current()
    }

    /// True when the value opts out of bulk loading.
    pub fn skips_merge(&self) -> bool {
        self.value
            .merge_skipper()
            .is_some_and(|skipper| skipper.skip_merge())
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("default_value", &self.default_value)
            .field("current", &self.current())
            .finish()
    }
}

/// A named set of flags.
#[derive(Debug, Default)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, Flag>,
    actual: BTreeSet<String>,
    args: Vec<String>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a flag. Redeclaring a name replaces the earlier flag.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        value: impl FlagValue,
        usage: impl Into<String>,
    ) -> &mut Self {
        let name = name.into();
        let flag = Flag {
            name: name.clone(),
            usage: usage.into(),
            default_value: value.current(),
            value: Box::new(value),
        };
        self.actual.remove(&name);
        self.flags.insert(name, flag);
        self
    }

    pub fn scalar<T>(
        &mut self,
        name: impl Into<String>,
        default: T,
        usage: impl Into<String>,
    ) -> &mut Self
    where
        T: FromStr + fmt::Display + Send + 'static,
        T::Err: fmt::Display,
    {
        self.define(name, Scalar::new(default), usage)
    }

    pub fn bool(
        &mut self,
        name: impl Into<String>,
        default: bool,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.define(name, Bool::new(default), usage)
    }

    pub fn list(&mut self, name: impl Into<String>, usage: impl Into<String>) -> &mut Self {
        self.define(name, StringList::new(), usage)
    }

    /// Look up a declared flag by name.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Borrow a flag's value as its concrete type.
    pub fn value<V: FlagValue>(&self, name: &str) -> Option<&V> {
        let value: &dyn FlagValue = &*self.flags.get(name)?.value;
        let value: &dyn Any = value;
        value.downcast_ref::<V>()
    }

    /// Shorthand for reading a [`Scalar`] flag.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T>
    where
        Scalar<T>: FlagValue,
    {
        self.value::<Scalar<T>>(name).map(Scalar::get)
    }

    /// Assign `value` to the named flag and mark it as explicitly set.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagError::UnknownFlag(name.to_string()))?;
        flag.value
            .set(value)
            .map_err(|source| FlagError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
                source,
            })?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Whether the named flag has been explicitly set.
    pub fn is_set(&self, name: &str) -> bool {
        self.actual.contains(name)
    }

    /// Every declared flag, in name order.
    pub fn visit_all(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Only the flags that have been explicitly set, in name order.
    pub fn visit(&self) -> impl Iterator<Item = &Flag> {
        self.actual.iter().filter_map(|name| self.flags.get(name))
    }

    /// Arguments left over after parsing.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Parse command-line arguments, not including the program name.
    ///
    /// Flags take the `--name=value` or `--name value` form, and boolean flags also
    /// accept a bare `--name`. Repeating a flag assigns each occurrence in order.
    /// Parsing stops at the first positional argument or after a `--` terminator, and
    /// everything left over is kept in [`FlagSet::args`].
    pub fn parse<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;

        let given: Vec<(String, Vec<String>)> = self
            .flags
            .keys()
            .filter(|name| {
                matches.value_source(name.as_str()) == Some(ValueSource::CommandLine)
            })
            .map(|name| (name.clone(), occurrences(&matches, name)))
            .collect();
        for (name, values) in &given {
            for value in values {
                self.set(name, value)?;
            }
        }

        self.args = occurrences(&matches, ARGS_ID);
        Ok(())
    }

    /// The clap command matching the declared flags.
    fn command(&self) -> Command {
        let flags = self.flags.values().map(|flag| {
            let arg = Arg::new(flag.name.clone())
                .long(flag.name.clone())
                .help(flag.usage.clone())
                .action(ArgAction::Append);
            if flag.value.is_bool_flag() {
                arg.num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
            } else {
                arg
            }
        });

        Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .color(ColorChoice::Never)
            .args(flags)
            .arg(
                Arg::new(ARGS_ID)
                    .value_name("ARGS")
                    .action(ArgAction::Append)
                    .num_args(1..)
                    .trailing_var_arg(true),
            )
    }
}

/// Id of the positional leftovers. Long names cannot start with `-`, so no flag
/// collides with it.
const ARGS_ID: &str = "--args";

fn occurrences(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .into_iter()
        .flatten()
        .cloned()
        .collect()
}
