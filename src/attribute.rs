//! Multi-slot attribute values
//!
//! The resolver only reads attributes through the [`Attribute`] trait. How an
//! attribute computes its effective values (modifier chains, caching) is up to
//! the implementor. [`SlotAttribute`] is a plain in-memory implementation.

use std::fmt;

use crate::value::Value;

/// Read surface of a bounded multi-slot value with an optional enabled flag.
///
/// Attributes are shared with resolvers running on other threads, so they
/// must be `Sync`.
pub trait Attribute: fmt::Debug + Sync {
    /// Number of addressable slots
    fn slot_count(&self) -> usize;

    /// Effective value of a slot, `None` when out of range
    fn slot(&self, index: usize) -> Option<Value<'static>>;

    /// Raw (unmodified) value of a slot, `None` when out of range
    fn raw_slot(&self, index: usize) -> Option<Value<'static>>;

    /// Enabled flag, `None` for attributes that cannot be toggled
    fn enabled(&self) -> Option<bool>;

    /// Self-formatted text. `is_source` is true when the attribute is shown
    /// in the context of its own owner.
    fn format_self(&self, is_source: bool) -> String;
}

/// An attribute holding its slots in memory
#[derive(Debug, Clone)]
pub struct SlotAttribute {
    raw: Vec<Value<'static>>,
    effective: Vec<Option<Value<'static>>>,
    enabled: Option<bool>,
    separator: String,
}

impl SlotAttribute {
    /// Create a non-toggleable attribute from its raw slot values
    pub fn new<I, V>(slots: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value<'static>>,
    {
        let raw: Vec<Value<'static>> = slots.into_iter().map(Into::into).collect();
        let effective = vec![None; raw.len()];
        Self {
            raw,
            effective,
            enabled: None,
            separator: "/".to_string(),
        }
    }

    /// Create a toggleable attribute
    pub fn toggle<I, V>(enabled: bool, slots: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value<'static>>,
    {
        Self::new(slots).with_enabled(enabled)
    }

    /// Set the enabled flag, making the attribute toggleable
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Override the effective value of one slot. Out-of-range indices are ignored.
    pub fn with_effective(mut self, index: usize, value: impl Into<Value<'static>>) -> Self {
        if let Some(slot) = self.effective.get_mut(index) {
            *slot = Some(value.into());
        }
        self
    }

    /// Set the text placed between slots when formatting
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Attribute for SlotAttribute {
    fn slot_count(&self) -> usize {
        self.raw.len()
    }

    fn slot(&self, index: usize) -> Option<Value<'static>> {
        match self.effective.get(index) {
            Some(Some(value)) => Some(value.clone()),
            _ => self.raw.get(index).cloned(),
        }
    }

    fn raw_slot(&self, index: usize) -> Option<Value<'static>> {
        self.raw.get(index).cloned()
    }

    fn enabled(&self) -> Option<bool> {
        self.enabled
    }

    fn format_self(&self, is_source: bool) -> String {
        if self.raw.is_empty() {
            return self.enabled.unwrap_or(true).to_string();
        }
        (0..self.raw.len())
            .filter_map(|i| self.slot(i))
            .map(|v| v.to_text(is_source))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}
