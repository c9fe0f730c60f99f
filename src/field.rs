use crate::value::Value;

/// One field's live value paired with its fallback default.
///
/// Presence is purely `Option::is_some`; both slots may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValue {
    value: Option<Value>,
    default_value: Option<Value>,
}

impl FieldValue {
    pub fn new(value: Option<Value>, default_value: Option<Value>) -> Self {
        Self {
            value,
            default_value,
        }
    }

    /// A field with a value and no default.
    pub fn with_value(value: Option<Value>) -> Self {
        Self::new(value, None)
    }

    /// A field with neither slot set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }

    pub fn set_default_value(&mut self, default_value: Option<Value>) {
        self.default_value = default_value;
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    pub fn values_missing(&self) -> bool {
        !self.has_value() && !self.has_default_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_slots_set() {
        let field = FieldValue::new(Some(3.into()), Some(7.into()));
        assert!(field.has_value());
        assert!(field.has_default_value());
        assert!(!field.values_missing());
        assert_eq!(field.value(), Some(&Value::Integer(3)));
        assert_eq!(field.default_value(), Some(&Value::Integer(7)));
    }

    #[test]
    fn with_value_leaves_default_absent() {
        let field = FieldValue::with_value(Some("hello".into()));
        assert!(field.has_value());
        assert!(!field.has_default_value());
    }

    #[test]
    fn empty_is_values_missing() {
        assert!(FieldValue::empty().values_missing());
        assert_eq!(FieldValue::empty(), FieldValue::new(None, None));
    }

    #[test]
    fn falsy_values_count_as_present() {
        assert!(FieldValue::with_value(Some(false.into())).has_value());
        assert!(FieldValue::with_value(Some(0.into())).has_value());
        assert!(FieldValue::with_value(Some("".into())).has_value());
    }

    #[test]
    fn setters_replace_and_clear() {
        let mut field = FieldValue::new(Some(1.into()), Some(2.into()));
        field.set_value(None);
        assert!(!field.has_value());
        assert_eq!(field.default_value(), Some(&Value::Integer(2)));

        field.set_default_value(None);
        assert!(field.values_missing());

        field.set_value(Some(true.into()));
        assert_eq!(field.value(), Some(&Value::Bool(true)));
    }
}
