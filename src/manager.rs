//! [`ConfigManager`]: the field store plus the diagnostics that go with it.
//!
//! The store itself never logs. The manager layers the documented side
//! effects on top: reading a field that had to fall back to its default logs
//! a WARN, reading one with nothing to fall back to logs an ERROR, and both
//! raise the missing-values flag. [`ConfigManager::resolve`] is the quiet
//! alternative for callers that want to decide for themselves.

use std::path::Path;

use indexmap::IndexMap;
use tracing::Level;

use crate::builder::{self, ConfigManagerBuilder};
use crate::diagnostics::{Diagnostics, LogSink, TracingSink};
use crate::error::ConfigError;
use crate::field::FieldValue;
use crate::file;
use crate::persist;
use crate::source::ConfigSource;
use crate::store::{ValueMap, ValueStore};
use crate::types::Resolution;
use crate::value::{FromValue, Value};

#[derive(Debug)]
pub struct ConfigManager {
    store: ValueStore,
    source: ConfigSource,
    diagnostics: Diagnostics,
    comments: IndexMap<String, Vec<String>>,
}

impl ConfigManager {
    pub(crate) fn assemble(
        store: ValueStore,
        source: ConfigSource,
        diagnostics: Diagnostics,
        comments: IndexMap<String, Vec<String>>,
    ) -> Self {
        Self {
            store,
            source,
            diagnostics,
            comments,
        }
    }

    pub fn builder() -> ConfigManagerBuilder {
        ConfigManagerBuilder::new()
    }

    /// An empty store.
    pub fn new(source: impl Into<ConfigSource>) -> Self {
        Self::from_store(ValueStore::new(), source.into())
    }

    /// A store holding exactly `fields`. `None` gives an empty store.
    pub fn from_field_values(
        fields: Option<IndexMap<String, FieldValue>>,
        source: impl Into<ConfigSource>,
    ) -> Self {
        let store = fields.map(ValueStore::from).unwrap_or_default();
        Self::from_store(store, source.into())
    }

    /// A store built from separate value and default maps.
    pub fn from_maps(
        values: Option<&ValueMap>,
        defaults: Option<&ValueMap>,
        source: impl Into<ConfigSource>,
    ) -> Self {
        let mut store = ValueStore::new();
        store.transfer_values(values);
        store.transfer_default_values(defaults);
        Self::from_store(store, source.into())
    }

    /// A store built from parallel lists; see [`build_from_lists`](crate::build_from_lists).
    pub fn from_lists(
        fields: &[&str],
        values: Option<&[Option<Value>]>,
        defaults: Option<&[Option<Value>]>,
        source: impl Into<ConfigSource>,
    ) -> Self {
        let store = ValueStore::from(builder::build_from_lists(fields, values, defaults));
        Self::from_store(store, source.into())
    }

    /// A store built from alternating `(path, value, default)` arguments;
    /// see [`build_from_triples`](crate::build_from_triples).
    pub fn from_alternating(
        source: impl Into<ConfigSource>,
        args: Vec<Option<Value>>,
    ) -> Result<Self, ConfigError> {
        let fields = builder::build_from_triples(args)?;
        Ok(Self::from_store(ValueStore::from(fields), source.into()))
    }

    /// Read a `.yml`, `.yaml`, `.toml` or `.json` file into a new manager.
    ///
    /// Nested mappings become dotted paths, comments are picked up where the
    /// format has them, and the source is the file's absolute path. The
    /// default slots all start empty.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_from_file_with_sink(path, Box::new(TracingSink))
    }

    pub fn load_from_file_with_sink(
        path: impl AsRef<Path>,
        sink: Box<dyn LogSink>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let loaded = file::load(path)?;

        let mut store = ValueStore::new();
        store.merge_values(loaded.fields);

        Ok(Self::assemble(
            store,
            ConfigSource::from_path(path),
            Diagnostics::new(sink),
            loaded.comments,
        ))
    }

    fn from_store(store: ValueStore, source: ConfigSource) -> Self {
        Self::assemble(store, source, Diagnostics::default(), IndexMap::new())
    }

    // --- entries ---

    /// The whole entry for `path`. A missing entry is reported.
    pub fn get_config_value(&mut self, path: &str) -> Option<&FieldValue> {
        let field = self.store.get(path);
        if field.is_none() {
            self.diagnostics.missing(&self.source, path, &[]);
        }
        field
    }

    /// Insert or replace the entry for `path`. `None` stores an empty field.
    pub fn set_config_value(&mut self, path: &str, field: Option<FieldValue>) {
        self.store.set(path, field);
    }

    /// Drop the entry for `path` and any comments attached to it.
    pub fn remove_field(&mut self, path: &str) -> Option<FieldValue> {
        self.comments.shift_remove(path);
        self.store.remove(path)
    }

    // --- values ---

    /// The value for `path`, falling back to its default.
    ///
    /// A fallback is reported at WARN with the default that stood in; a
    /// field with neither slot set (or no entry at all) is reported at ERROR
    /// and yields `None`. Either way the missing-values flag goes up.
    pub fn get_value(&mut self, path: &str) -> Option<&Value> {
        match self.store.resolve(path) {
            Resolution::Value(value) => Some(value),
            Resolution::Default(default) => {
                self.diagnostics.missing_with_replacement(
                    &self.source,
                    path,
                    &default.to_string(),
                    &[],
                );
                Some(default)
            }
            Resolution::Missing => {
                self.diagnostics.missing(&self.source, path, &[]);
                None
            }
        }
    }

    /// [`get_value`](Self::get_value) converted to `T`. A value of the wrong
    /// kind is reported and yields `None`.
    pub fn get_as<T: FromValue>(&mut self, path: &str) -> Option<T> {
        let (converted, found) = {
            let value = self.get_value(path)?;
            (T::from_value(value), value.type_name())
        };
        if converted.is_none() {
            self.diagnostics
                .invalid(&self.source, path, T::EXPECTED, found);
        }
        converted
    }

    /// [`get_as`](Self::get_as), with `fallback` when nothing usable was
    /// found.
    pub fn get_or<T: FromValue>(&mut self, path: &str, fallback: T) -> T {
        self.get_as(path).unwrap_or(fallback)
    }

    /// Resolve `path` without logging or touching the flag.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        self.store.resolve(path)
    }

    pub fn set_value(&mut self, path: &str, value: Option<Value>) {
        self.store.set_value(path, value);
    }

    /// The default for `path`. Never reported, even when absent.
    pub fn get_default_value(&self, path: &str) -> Option<&Value> {
        self.store.default_value(path)
    }

    pub fn set_default_value(&mut self, path: &str, default_value: Option<Value>) {
        self.store.set_default_value(path, default_value);
    }

    /// `Some(map)` merges into the value slots; `None` empties every value
    /// slot and leaves the defaults in place.
    pub fn transfer_values(&mut self, values: Option<&ValueMap>) {
        self.store.transfer_values(values);
    }

    /// `Some(map)` merges into the default slots; `None` empties every
    /// default slot and leaves the values in place.
    pub fn transfer_default_values(&mut self, defaults: Option<&ValueMap>) {
        self.store.transfer_default_values(defaults);
    }

    /// Paths under `parent`; see [`ValueStore::section_fields`].
    pub fn get_config_section_fields(
        &self,
        parent: &str,
        full_fields: bool,
        deep_fields: bool,
    ) -> Vec<String> {
        self.store.section_fields(parent, full_fields, deep_fields)
    }

    // --- diagnostics ---

    /// Whether any lookup has been reported since the flag was last reset.
    pub fn is_missing_values(&self) -> bool {
        self.diagnostics.missing_values()
    }

    pub fn set_missing_values(&mut self, missing: bool) {
        self.diagnostics.set_missing_values(missing);
    }

    pub fn set_sink(&mut self, sink: Box<dyn LogSink>) {
        self.diagnostics.set_sink(sink);
    }

    pub fn log_messages(&self, level: Level, messages: &[&str]) -> Result<(), ConfigError> {
        self.diagnostics.log_messages(level, messages)
    }

    pub fn log_missing_value(&mut self, path: &str, extra: &[&str]) {
        self.diagnostics.missing(&self.source, path, extra);
    }

    pub fn log_missing_value_with_replacement(
        &mut self,
        path: &str,
        replacement: &str,
        extra: &[&str],
    ) {
        self.diagnostics
            .missing_with_replacement(&self.source, path, replacement, extra);
    }

    // --- comments ---

    pub fn comments(&self) -> &IndexMap<String, Vec<String>> {
        &self.comments
    }

    pub fn comments_for(&self, path: &str) -> Option<&[String]> {
        self.comments.get(path).map(Vec::as_slice)
    }

    /// Replace the comment lines for `path`; an empty list removes them.
    pub fn set_comments(&mut self, path: &str, lines: Vec<String>) {
        if lines.is_empty() {
            self.comments.shift_remove(path);
        } else {
            self.comments.insert(path.to_string(), lines);
        }
    }

    pub fn set_all_comments(&mut self, comments: IndexMap<String, Vec<String>>) {
        self.comments = comments;
    }

    // --- source and store ---

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<ConfigSource>) {
        self.source = source.into();
    }

    pub fn values(&self) -> &ValueStore {
        &self.store
    }

    /// Direct store access. Changes made here are never reported.
    pub fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.store
    }

    // --- persistence ---

    /// Write the value slots to `path`, in the format its extension names.
    /// Defaults and absent values are not written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        persist::save(path.as_ref(), &self.store.flatten_values(), &self.comments)
    }

    /// [`save_to_file`](Self::save_to_file) targeting the source locator.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_file(self.source.as_path())
    }
}
