//! The field store: dotted paths mapped to [`FieldValue`]s.
//!
//! Everything here is side-effect free. The logging and missing-values
//! bookkeeping that callers see lives one level up, in
//! [`ConfigManager`](crate::ConfigManager).
//!
//! Entries keep insertion order, so a store loaded from a file iterates (and
//! saves) in file order.

use indexmap::IndexMap;

use crate::field::FieldValue;
use crate::types::Resolution;
use crate::value::Value;

/// Path -> value map, the shape used for bulk transfers. A `None` entry
/// empties that slot (creating the field if needed).
pub type ValueMap = IndexMap<String, Option<Value>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    entries: IndexMap<String, FieldValue>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FieldValue> {
        self.entries.get_mut(path)
    }

    /// Insert or replace an entry wholesale. `None` stores an empty field.
    pub fn set(&mut self, path: &str, field: Option<FieldValue>) {
        self.entries
            .insert(path.to_string(), field.unwrap_or_default());
    }

    /// Remove an entry entirely, returning it.
    pub fn remove(&mut self, path: &str) -> Option<FieldValue> {
        self.entries.shift_remove(path)
    }

    /// Set the value slot, keeping any default. Creates the entry if needed.
    pub fn set_value(&mut self, path: &str, value: Option<Value>) {
        match self.entries.get_mut(path) {
            Some(field) => field.set_value(value),
            None => {
                self.entries
                    .insert(path.to_string(), FieldValue::with_value(value));
            }
        }
    }

    /// Set the default slot, keeping any value. Creates the entry if needed.
    pub fn set_default_value(&mut self, path: &str, default_value: Option<Value>) {
        match self.entries.get_mut(path) {
            Some(field) => field.set_default_value(default_value),
            None => {
                self.entries
                    .insert(path.to_string(), FieldValue::new(None, default_value));
            }
        }
    }

    /// The default slot of `path`, if the entry exists and has one.
    pub fn default_value(&self, path: &str) -> Option<&Value> {
        self.entries.get(path).and_then(FieldValue::default_value)
    }

    /// Resolve `path`: the value wins, the default is the fallback, and a
    /// missing entry is indistinguishable from one with both slots empty.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        let Some(field) = self.entries.get(path) else {
            return Resolution::Missing;
        };
        match (field.value(), field.default_value()) {
            (Some(value), _) => Resolution::Value(value),
            (None, Some(default)) => Resolution::Default(default),
            (None, None) => Resolution::Missing,
        }
    }

    /// Merge `values` into the value slots. Entries not mentioned are left
    /// alone.
    pub fn merge_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Option<Value>>,
    {
        for (path, value) in values {
            self.set_value(path.as_ref(), value.into());
        }
    }

    /// Merge `defaults` into the default slots. Entries not mentioned are
    /// left alone.
    pub fn merge_default_values<I, K, V>(&mut self, defaults: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Option<Value>>,
    {
        for (path, default) in defaults {
            self.set_default_value(path.as_ref(), default.into());
        }
    }

    /// Empty every value slot; defaults are untouched.
    pub fn clear_values(&mut self) {
        for field in self.entries.values_mut() {
            field.set_value(None);
        }
    }

    /// Empty every default slot; values are untouched.
    pub fn clear_default_values(&mut self) {
        for field in self.entries.values_mut() {
            field.set_default_value(None);
        }
    }

    /// `Some(map)` merges into the value slots, `None` clears all of them.
    pub fn transfer_values(&mut self, values: Option<&ValueMap>) {
        match values {
            Some(map) => self.merge_values(map.iter().map(|(k, v)| (k, v.clone()))),
            None => self.clear_values(),
        }
    }

    /// `Some(map)` merges into the default slots, `None` clears all of them.
    pub fn transfer_default_values(&mut self, defaults: Option<&ValueMap>) {
        match defaults {
            Some(map) => self.merge_default_values(map.iter().map(|(k, v)| (k, v.clone()))),
            None => self.clear_default_values(),
        }
    }

    /// Paths nested under `parent`.
    ///
    /// Matching is by whole segments: `"field"` is the parent of
    /// `"field.deep"` but not of `"field2.x"`, and a path is never its own
    /// child. An empty `parent` is the root.
    ///
    /// - `deep_fields = false` keeps only direct children (one segment deeper).
    /// - `full_fields = false` strips the parent and its separator from each
    ///   result, giving paths relative to `parent`.
    pub fn section_fields(&self, parent: &str, full_fields: bool, deep_fields: bool) -> Vec<String> {
        let parent_segments: Vec<&str> = if parent.is_empty() {
            Vec::new()
        } else {
            parent.split('.').collect()
        };

        self.entries
            .keys()
            .filter_map(|path| {
                let segments: Vec<&str> = path.split('.').collect();
                if segments.len() <= parent_segments.len()
                    || !segments.starts_with(&parent_segments)
                {
                    return None;
                }
                if !deep_fields && segments.len() - parent_segments.len() > 1 {
                    return None;
                }
                Some(if full_fields {
                    path.clone()
                } else {
                    segments[parent_segments.len()..].join(".")
                })
            })
            .collect()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Value slots only, in store order. Empty value slots are skipped.
    pub fn flatten_values(&self) -> IndexMap<String, Value> {
        self.entries
            .iter()
            .filter_map(|(path, field)| field.value().map(|v| (path.clone(), v.clone())))
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for ValueStore {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<IndexMap<String, FieldValue>> for ValueStore {
    fn from(entries: IndexMap<String, FieldValue>) -> Self {
        Self { entries }
    }
}
