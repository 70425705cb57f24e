//! Subjects expose named fields to `s.` and `d.` selectors

use std::collections::HashMap;

use crate::attribute::Attribute;
use crate::value::Value;

/// An object whose fields can be read by name
pub trait Subject: Sync {
    /// Look up a field. `None` means the subject has no such field.
    fn field(&self, name: &str) -> Option<Value<'_>>;
}

#[derive(Debug)]
enum Field {
    Plain(Value<'static>),
    Attribute(Box<dyn Attribute>),
}

/// A subject backed by a name -> field map
#[derive(Debug, Default)]
pub struct FieldMap {
    fields: HashMap<String, Field>,
}

impl FieldMap {
    /// Create an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a plain field
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value<'static>>) {
        self.fields.insert(name.into(), Field::Plain(value.into()));
    }

    /// Insert an attribute field
    pub fn insert_attribute(&mut self, name: impl Into<String>, attribute: impl Attribute + 'static) {
        self.fields
            .insert(name.into(), Field::Attribute(Box::new(attribute)));
    }

    /// Builder form of [`FieldMap::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value<'static>>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder form of [`FieldMap::insert_attribute`]
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        attribute: impl Attribute + 'static,
    ) -> Self {
        self.insert_attribute(name, attribute);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Subject for FieldMap {
    fn field(&self, name: &str) -> Option<Value<'_>> {
        match self.fields.get(name)? {
            Field::Plain(value) => Some(value.clone()),
            Field::Attribute(attr) => Some(Value::Attribute(attr.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::SlotAttribute;

    #[test]
    fn test_plain_and_attribute_fields() {
        let subject = FieldMap::new()
            .with("name", "Archer")
            .with_attribute("range", SlotAttribute::toggle(true, [5]));

        assert_eq!(subject.len(), 2);
        assert!(matches!(subject.field("name"), Some(Value::Text(s)) if s == "Archer"));

        let range = subject.field("range").and_then(|v| v.as_attribute());
        assert_eq!(range.map(|a| a.slot_count()), Some(1));
    }

    #[test]
    fn test_missing_field() {
        let subject = FieldMap::new();
        assert!(subject.is_empty());
        assert!(subject.field("nope").is_none());
    }
}
