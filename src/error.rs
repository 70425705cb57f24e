//! Error types for template resolution

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Character range in template text
pub type Span = std::ops::Range<usize>;

/// Which part of the resolution context a selector needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextRole {
    /// The `s` subject
    Source,
    /// The `d` subject
    Display,
    /// The `a` attribute
    Attribute,
}

impl fmt::Display for ContextRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContextRole::Source => "source subject",
            ContextRole::Display => "display subject",
            ContextRole::Attribute => "attribute",
        })
    }
}

/// Errors that abort a resolve call
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Text ended before the expression was closed
    #[error("unterminated expression at {span:?}")]
    UnterminatedExpression { span: Span },

    /// Escape character with nothing after it
    #[error("escape character at end of template at {span:?}")]
    DanglingEscape { span: Span },

    /// Too many `{` levels inside one expression
    #[error("expressions nested deeper than {max} levels at {span:?}")]
    NestingTooDeep { max: usize, span: Span },

    /// `?` without a matching `|` before the closing brace
    #[error("branch in '{selector}' has no second alternative at {span:?}")]
    IncompleteBranch { selector: String, span: Span },

    /// More than three dot-separated segments
    #[error("selector '{selector}' has more than three segments")]
    SelectorTooLong { selector: String, span: Span },

    /// Selector shape not allowed
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        selector: String,
        reason: String,
        span: Span,
    },

    /// Attribute slot index past the slot count
    #[error("slot {slot} of '{selector}' is out of range (attribute has {count} slots)")]
    SlotOutOfRange {
        selector: String,
        slot: usize,
        count: usize,
        span: Span,
    },

    /// Positional argument index past the argument list
    #[error("argument {index} is out of range ({len} arguments supplied)")]
    ArgumentOutOfRange { index: usize, len: usize, span: Span },

    /// Selector needs a subject or attribute that was not supplied
    #[error("{role} is not supplied")]
    MissingContext { role: ContextRole, span: Span },

    /// Field absent on a supplied subject
    #[error("field '{field}' not found on {role}")]
    MissingField {
        role: ContextRole,
        field: String,
        span: Span,
    },

    /// `e` sub selector on an attribute that cannot be toggled
    #[error("'{selector}' has no enabled flag")]
    NoEnabledFlag { selector: String, span: Span },

    /// Unsupported format specifier
    #[error("invalid format '{spec}': {reason}")]
    InvalidFormat {
        spec: String,
        reason: String,
        span: Span,
    },

    /// Failure while expanding a string-table entry
    #[error("in string table entry '{key}': {source}")]
    InEntry {
        key: String,
        template: String,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    pub(crate) fn invalid_selector(
        selector: impl Into<String>,
        reason: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
            span,
        }
    }

    pub(crate) fn in_entry(key: &str, template: &str, source: ResolveError) -> Self {
        Self::InEntry {
            key: key.to_string(),
            template: template.to_string(),
            source: Box::new(source),
        }
    }

    /// Span of the failing expression in the text it was raised for.
    ///
    /// For [`ResolveError::InEntry`] this is the span inside the entry text.
    pub fn span(&self) -> &Span {
        match self {
            ResolveError::UnterminatedExpression { span }
            | ResolveError::DanglingEscape { span }
            | ResolveError::NestingTooDeep { span, .. }
            | ResolveError::IncompleteBranch { span, .. }
            | ResolveError::SelectorTooLong { span, .. }
            | ResolveError::InvalidSelector { span, .. }
            | ResolveError::SlotOutOfRange { span, .. }
            | ResolveError::ArgumentOutOfRange { span, .. }
            | ResolveError::MissingContext { span, .. }
            | ResolveError::MissingField { span, .. }
            | ResolveError::NoEnabledFlag { span, .. }
            | ResolveError::InvalidFormat { span, .. } => span,
            ResolveError::InEntry { source, .. } => source.span(),
        }
    }

    /// The innermost error, looking through string-table entries
    pub fn root(&self) -> &ResolveError {
        match self {
            ResolveError::InEntry { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is a grammar or selector-shape error
    pub fn is_syntax(&self) -> bool {
        matches!(
            self.root(),
            ResolveError::UnterminatedExpression { .. }
                | ResolveError::DanglingEscape { .. }
                | ResolveError::NestingTooDeep { .. }
                | ResolveError::IncompleteBranch { .. }
                | ResolveError::SelectorTooLong { .. }
                | ResolveError::InvalidSelector { .. }
                | ResolveError::SlotOutOfRange { .. }
                | ResolveError::InvalidFormat { .. }
        )
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        if let ResolveError::InEntry {
            key,
            template,
            source: inner,
        } = self
        {
            return inner.format(template, key);
        }

        let span = self.span().clone();
        let message = self.to_string();
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => message,
        }
    }
}

/// Result type for resolve operations
pub type ResolveResult<T> = Result<T, ResolveError>;
