//! Field-level configuration access with default fallback and missing-value
//! diagnostics.
//!
//! Fieldfig keeps every configuration field under a dotted path
//! (`"database.url"`) and pairs its live value with an optional default. Reads
//! fall back to the default when the value is gone, and every fallback or
//! miss is reported through a log sink and remembered in a flag, so a host
//! can finish reading its config and then decide whether to complain.
//!
//! ```
//! use fieldfig::{ConfigManager, Value, ValueMap};
//!
//! let mut defaults = ValueMap::new();
//! defaults.insert("port".into(), Some(Value::from(8080)));
//! defaults.insert("motd".into(), Some(Value::from("welcome")));
//!
//! let mut values = ValueMap::new();
//! values.insert("port".into(), Some(Value::from(25565)));
//!
//! let mut config = ConfigManager::from_maps(Some(&values), Some(&defaults), "plugins/config.yml");
//!
//! assert_eq!(config.get_as::<i64>("port"), Some(25565));
//! assert!(!config.is_missing_values());
//!
//! // Falls back to the default and logs a warning.
//! assert_eq!(config.get_as::<String>("motd").as_deref(), Some("welcome"));
//! assert!(config.is_missing_values());
//! ```
//!
//! # Fields and resolution
//!
//! A [`FieldValue`] has two independent slots, `value` and `default_value`,
//! either of which may be empty. Resolving a path follows one rule:
//!
//! ```text
//! value present            -> value
//! value empty, default set -> default   (WARN, flag raised)
//! both empty, or no entry  -> nothing   (ERROR, flag raised)
//! ```
//!
//! [`ConfigManager::get_value`] applies the rule with its reporting;
//! [`ConfigManager::resolve`] returns the same answer as a [`Resolution`]
//! without logging anything. A missing field is never an `Err`: the host
//! keeps running and checks [`is_missing_values`](ConfigManager::is_missing_values)
//! when it wants to.
//!
//! # Diagnostics
//!
//! Reports go to a [`LogSink`]. The default [`TracingSink`] emits `tracing`
//! events under the `fieldfig` target, so they land wherever the host's
//! subscriber sends them. Plug in another sink through the builder or
//! [`set_sink`](ConfigManager::set_sink).
//!
//! # Building a manager
//!
//! - [`ConfigManager::new`]: empty.
//! - [`ConfigManager::from_field_values`]: ready-made entries.
//! - [`ConfigManager::from_maps`]: separate value and default maps.
//! - [`ConfigManager::from_lists`]: parallel field / value / default lists.
//! - [`ConfigManager::from_alternating`]: flat `(path, value, default)`
//!   triples.
//! - [`ConfigManager::builder`]: any mix of the above, plus a custom sink.
//! - [`ConfigManager::load_from_file`]: a YAML, TOML or JSON file.
//!
//! # Files
//!
//! `.yml`, `.yaml`, `.toml` and `.json` files are read and written (see
//! [`FileFormat`]). Nested mappings become dotted paths on load and are
//! rebuilt on save; lists stay whole. Comment blocks directly above a key in
//! YAML or TOML are kept by path and written back on save. Only value slots
//! are saved: defaults live in code.

pub mod error;
pub mod types;

mod builder;
mod comments;
mod diagnostics;
mod field;
mod file;
mod flatten;
mod manager;
mod nest;
mod persist;
mod source;
mod store;
mod value;

#[cfg(test)]
mod fixtures;

pub use builder::{ConfigManagerBuilder, build_from_lists, build_from_triples, build_object_map};
pub use comments::CommentMap;
pub use diagnostics::{LogSink, TracingSink};
pub use error::ConfigError;
pub use field::FieldValue;
pub use manager::ConfigManager;
pub use source::ConfigSource;
pub use store::{ValueMap, ValueStore};
pub use types::{FileFormat, Resolution};
pub use value::{FromValue, Value};
