//! Tagged values flowing through selector evaluation

use std::fmt;

use crate::attribute::Attribute;

/// A value produced by a subject field, a positional argument or an
/// attribute slot, before it is turned into text.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    /// Plain text
    Text(String),
    /// Any numeric value
    Number(f64),
    /// A boolean flag
    Bool(bool),
    /// A reference to a multi-slot attribute
    Attribute(&'a dyn Attribute),
}

impl<'a> Value<'a> {
    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Attribute(_) => "attribute",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&'a dyn Attribute> {
        match self {
            Value::Attribute(a) => Some(*a),
            _ => None,
        }
    }

    /// Default text conversion.
    ///
    /// Attributes format themselves; `is_source` is forwarded to
    /// [`Attribute::format_self`].
    pub fn to_text(&self, is_source: bool) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
            Value::Attribute(a) => a.format_self(is_source),
        }
    }
}

/// Attribute-free values print directly; attributes print as their
/// non-source self format.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    n.to_string()
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value<'_> {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value<'_> {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value<'_> {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value<'_> {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value<'_> {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value<'_> {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<'a, A: Attribute> From<&'a A> for Value<'a> {
    fn from(a: &'a A) -> Self {
        Value::Attribute(a)
    }
}
