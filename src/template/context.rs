//! Per-call resolution context

use std::fmt;

use crate::attribute::Attribute;
use crate::subject::Subject;
use crate::value::Value;

/// What a template may read while it is resolved: two optional subjects, an
/// optional attribute for `a` selectors, and positional arguments.
///
/// A context is built per call and only borrowed by the resolver.
#[derive(Clone, Default)]
pub struct ResolutionContext<'a> {
    source: Option<&'a dyn Subject>,
    display: Option<&'a dyn Subject>,
    attribute: Option<&'a dyn Attribute>,
    args: Vec<Value<'a>>,
}

impl<'a> ResolutionContext<'a> {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context holding only positional arguments
    pub fn with_args_only<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value<'a>>,
    {
        Self::new().with_args(args)
    }

    /// Set the subject read by `s.` selectors
    pub fn with_source(mut self, source: &'a dyn Subject) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the subject read by `d.` selectors
    pub fn with_display(mut self, display: &'a dyn Subject) -> Self {
        self.display = Some(display);
        self
    }

    /// Use one subject as both source and display
    pub fn with_subject(self, subject: &'a dyn Subject) -> Self {
        self.with_source(subject).with_display(subject)
    }

    /// Set the attribute read by `a` selectors
    pub fn with_attribute(mut self, attribute: &'a dyn Attribute) -> Self {
        self.attribute = Some(attribute);
        self
    }

    /// Append one positional argument
    pub fn with_arg(mut self, arg: impl Into<Value<'a>>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append positional arguments
    pub fn with_args<I, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value<'a>>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn source(&self) -> Option<&'a dyn Subject> {
        self.source
    }

    pub fn display(&self) -> Option<&'a dyn Subject> {
        self.display
    }

    pub fn attribute(&self) -> Option<&'a dyn Attribute> {
        self.attribute
    }

    pub fn args(&self) -> &[Value<'a>] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Value<'a>> {
        self.args.get(index)
    }

    /// True when source and display are the same object, or both absent.
    /// Attributes format differently when shown on their own owner.
    pub fn is_source_context(&self) -> bool {
        match (self.source, self.display) {
            (None, None) => true,
            (Some(s), Some(d)) => std::ptr::eq(s as *const _ as *const (), d as *const _ as *const ()),
            _ => false,
        }
    }
}

impl fmt::Debug for ResolutionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("source", &self.source.is_some())
            .field("display", &self.display.is_some())
            .field("attribute", &self.attribute)
            .field("args", &self.args)
            .finish()
    }
}
