use indexmap::IndexMap;

use crate::diagnostics::{Diagnostics, LogSink, TracingSink};
use crate::error::ConfigError;
use crate::field::FieldValue;
use crate::manager::ConfigManager;
use crate::source::ConfigSource;
use crate::store::{ValueMap, ValueStore};
use crate::value::Value;

/// Builder for a [`ConfigManager`].
///
/// Every setter layers onto the same store in call order, so a later
/// [`field()`](Self::field) replaces an entry that [`values()`](Self::values)
/// created, while [`values()`](Self::values) and
/// [`defaults()`](Self::defaults) only touch their own slot.
///
/// ```
/// use fieldfig::{ConfigManager, FieldValue, Value};
///
/// let mut manager = ConfigManager::builder()
///     .source("plugins/config.yml")
///     .field("port", FieldValue::new(None, Some(Value::from(8080))))
///     .build()
///     .unwrap();
/// assert_eq!(manager.get_value("port"), Some(&Value::Integer(8080)));
/// ```
pub struct ConfigManagerBuilder {
    source: Option<ConfigSource>,
    sink: Option<Box<dyn LogSink>>,
    store: ValueStore,
    comments: IndexMap<String, Vec<String>>,
}

impl ConfigManagerBuilder {
    pub(crate) fn new() -> Self {
        Self {
            source: None,
            sink: None,
            store: ValueStore::new(),
            comments: IndexMap::new(),
        }
    }

    /// Where the values came from. Required.
    pub fn source(mut self, source: impl Into<ConfigSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Destination for diagnostics (default: [`TracingSink`]).
    pub fn sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Like [`sink()`](Self::sink), for an already boxed sink.
    pub fn boxed_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Merge `values` into the value slots.
    pub fn values(mut self, values: &ValueMap) -> Self {
        self.store.transfer_values(Some(values));
        self
    }

    /// Merge `defaults` into the default slots.
    pub fn defaults(mut self, defaults: &ValueMap) -> Self {
        self.store.transfer_default_values(Some(defaults));
        self
    }

    /// Insert or replace one entry wholesale.
    pub fn field(mut self, path: &str, field: FieldValue) -> Self {
        self.store.set(path, Some(field));
        self
    }

    /// Insert or replace every entry of `fields`.
    pub fn fields(mut self, fields: IndexMap<String, FieldValue>) -> Self {
        for (path, field) in fields {
            self.store.set(&path, Some(field));
        }
        self
    }

    /// Attach comment lines to `path`, written back on save.
    pub fn comments(mut self, path: &str, lines: Vec<String>) -> Self {
        self.comments.insert(path.to_string(), lines);
        self
    }

    pub fn build(self) -> Result<ConfigManager, ConfigError> {
        let source = self
            .source
            .ok_or_else(|| ConfigError::invalid("a config source is required"))?;
        let sink = self.sink.unwrap_or_else(|| Box::new(TracingSink));
        Ok(ConfigManager::assemble(
            self.store,
            source,
            Diagnostics::new(sink),
            self.comments,
        ))
    }
}

/// Group alternating `(path, value, default)` arguments into entries.
///
/// `["a", None, None, "b", 1, 2]` yields `a` with both slots empty and `b`
/// with value 1 and default 2. A repeated path replaces the earlier entry.
pub fn build_from_triples(
    args: Vec<Option<Value>>,
) -> Result<IndexMap<String, FieldValue>, ConfigError> {
    if args.len() % 3 != 0 {
        return Err(ConfigError::ArgumentCount { len: args.len() });
    }

    let mut fields = IndexMap::new();
    let mut args = args.into_iter();
    let mut position = 0;
    while let (Some(path), Some(value), Some(default)) = (args.next(), args.next(), args.next())
    {
        let path = field_path(path, position)?;
        fields.insert(path, FieldValue::new(value, default));
        position += 3;
    }
    Ok(fields)
}

/// Group alternating `(path, value)` arguments into a map. A `None` value is
/// kept, so transferring the map empties that slot.
pub fn build_object_map(args: Vec<Option<Value>>) -> Result<ValueMap, ConfigError> {
    if args.len() % 2 != 0 {
        return Err(ConfigError::invalid(format!(
            "alternating (field, value) arguments must come in pairs, got {}",
            args.len()
        )));
    }

    let mut map = ValueMap::new();
    let mut args = args.into_iter();
    let mut position = 0;
    while let (Some(path), Some(value)) = (args.next(), args.next()) {
        let path = field_path(path, position)?;
        map.insert(path, value);
        position += 2;
    }
    Ok(map)
}

/// Zip parallel lists into entries: `values[i]` and `defaults[i]` belong to
/// `fields[i]`. A missing list, or one shorter than `fields`, leaves the
/// remaining slots empty; extra trailing items are ignored.
pub fn build_from_lists(
    fields: &[&str],
    values: Option<&[Option<Value>]>,
    defaults: Option<&[Option<Value>]>,
) -> IndexMap<String, FieldValue> {
    let slot = |list: Option<&[Option<Value>]>, i: usize| -> Option<Value> {
        list.and_then(|l| l.get(i)).cloned().flatten()
    };

    fields
        .iter()
        .enumerate()
        .map(|(i, path)| {
            (
                path.to_string(),
                FieldValue::new(slot(values, i), slot(defaults, i)),
            )
        })
        .collect()
}

fn field_path(arg: Option<Value>, position: usize) -> Result<String, ConfigError> {
    match arg {
        Some(Value::String(path)) => Ok(path),
        Some(other) => Err(ConfigError::invalid(format!(
            "argument {position} must be a field name, got {}",
            other.type_name()
        ))),
        None => Err(ConfigError::invalid(format!(
            "argument {position} must be a field name, got nothing"
        ))),
    }
}
