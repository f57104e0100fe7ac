//! Fill command-line flags from environment variables, maps, and `.env` files.
//!
//! A [`Loader`] pairs a key function (flag name -> lookup key) with a lookup function
//! (key -> values) and assigns whatever it finds to the flags of a [`FlagSet`]:
//!
//! ```
//! use std::collections::HashMap;
//! use flagenv::{FlagSet, Loader, keys, lookup};
//!
//! let mut flags = FlagSet::new("demo");
//! flags.scalar("max-retries", 3u32, "retry budget").list("peer", "peer addresses");
//! flags.parse(["--max-retries=5"]).unwrap();
//!
//! let env = HashMap::from([
//!     ("APP_MAX_RETRIES".to_string(), "9".to_string()),
//!     ("APP_PEER_1".to_string(), "10.0.0.1".to_string()),
//!     ("APP_PEER_2".to_string(), "10.0.0.2".to_string()),
//! ]);
//! let loader = Loader::new()
//!     .with_key(keys::uppercased(keys::with_prefix("APP_", keys::snake_case)))
//!     .with_lookup(lookup::with_indexed_lookup(lookup::map_value(env), "_", 1));
//!
//! loader.set_missing(&mut flags).unwrap();
//! assert_eq!(flags.get::<u32>("max-retries"), Some(&5));
//! assert_eq!(
//!     flags.value::<flagenv::StringList>("peer").unwrap().values(),
//!     ["10.0.0.1", "10.0.0.2"]
//! );
//! ```

mod error;
pub mod flag;
pub mod keys;
mod loader;
pub mod lookup;
pub mod source;

pub use error::{FlagError, LoadError, LookupError, SourceError, ValueError};
pub use flag::{Bool, Flag, FlagSet, FlagValue, Pinned, Scalar, SkipMerge, StringList};
pub use keys::KeyFn;
pub use loader::{Loader, default_loader, default_prefix, set_all, set_missing, set_one};
pub use lookup::LookupFn;
