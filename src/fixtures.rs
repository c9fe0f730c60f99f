#[cfg(test)]
pub mod test {
    use std::sync::{Arc, Mutex};

    use indexmap::IndexMap;
    use tracing::Level;

    use crate::diagnostics::LogSink;
    use crate::field::FieldValue;
    use crate::store::{ValueMap, ValueStore};
    use crate::value::Value;

    /// Sink that keeps every message for later inspection. Clones share the
    /// same buffer.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        records: Arc<Mutex<Vec<(Level, String)>>>,
    }

    impl RecordingSink {
        pub fn records(&self) -> Vec<(Level, String)> {
            self.records.lock().unwrap().clone()
        }

        pub fn count_at(&self, level: Level) -> usize {
            self.records().iter().filter(|(l, _)| *l == level).count()
        }
    }

    impl LogSink for RecordingSink {
        fn log(&self, level: Level, message: &str) {
            self.records
                .lock()
                .unwrap()
                .push((level, message.to_string()));
        }
    }

    pub fn sorted(mut fields: Vec<String>) -> Vec<String> {
        fields.sort();
        fields
    }

    /// The standard field set: scalars of each kind, a default-only field, an
    /// empty field and one nested value.
    pub fn field_values() -> IndexMap<String, FieldValue> {
        let mut values = IndexMap::new();
        values.insert("int".to_string(), FieldValue::new(Some(3.into()), Some(7.into())));
        values.insert(
            "double".to_string(),
            FieldValue::new(Some(2.5.into()), Some(9.2.into())),
        );
        values.insert(
            "string".to_string(),
            FieldValue::new(Some("hello".into()), Some("goodbye".into())),
        );
        values.insert("def".to_string(), FieldValue::new(None, Some(1.5.into())));
        values.insert("all-missing".to_string(), FieldValue::empty());
        values.insert(
            "nested.value".to_string(),
            FieldValue::new(Some(true.into()), Some(false.into())),
        );
        values
    }

    pub fn values_map() -> ValueMap {
        let mut map = ValueMap::new();
        map.insert("int".into(), Some(Value::from(3)));
        map.insert("double".into(), Some(Value::from(2.5)));
        map.insert("string".into(), Some(Value::from("hello")));
        map.insert("nested.value".into(), Some(Value::from(true)));
        map
    }

    pub fn defaults_map() -> ValueMap {
        let mut map = ValueMap::new();
        map.insert("int".into(), Some(Value::from(7)));
        map.insert("double".into(), Some(Value::from(9.2)));
        map.insert("string".into(), Some(Value::from("goodbye")));
        map.insert("nested.value".into(), Some(Value::from(false)));
        map
    }

    /// Store used by the section query tests.
    pub fn section_store() -> ValueStore {
        [
            ("int", 3, 7),
            ("nested.value", 1, 0),
            ("nested.another", 10, 11),
            ("field.deep", 1, 2),
            ("field.even.deeper", 3, 4),
            ("field.even.more.deeper", 5, 6),
        ]
        .into_iter()
        .map(|(path, v, d)| {
            (
                path.to_string(),
                FieldValue::new(Some(v.into()), Some(d.into())),
            )
        })
        .collect()
    }
}
