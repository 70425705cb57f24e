//! Selector evaluation
//!
//! A selector has one to three dot-separated segments:
//!
//! | Selector | Resolves to |
//! |----------|-------------|
//! | `a` | attribute-self, self-formatted |
//! | `0`-`9` | positional argument |
//! | `Key` | string-table entry, expanded recursively |
//! | `a.e`, `a.0` | attribute-self enabled flag or slot |
//! | `s.field`, `d.field` | subject field |
//! | `s.field.e`, `d.field.1` | enabled flag or slot of an attribute field |
//!
//! With a `?false|true` branch pair the evaluated value picks a branch: a
//! bool picks directly, a number picks `true` only when it equals 1, and any
//! other value ignores the branches and is returned as is.

use crate::attribute::Attribute;
use crate::error::{ContextRole, ResolveError, ResolveResult, Span};
use crate::value::Value;

use super::context::ResolutionContext;
use super::format;
use super::resolver::Resolver;

/// Where an expression appears, which decides whether table keys expand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Site {
    /// Directly in template text
    Entry,
    /// Nested inside another expression's selector
    Selector,
    /// Nested inside a branch
    Branch,
}

impl Site {
    fn expands_table(self) -> bool {
        !matches!(self, Site::Selector)
    }
}

/// The two alternatives of `?false|true`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Branches {
    pub if_false: String,
    pub if_true: String,
}

impl Branches {
    /// Pick a branch for `value`, or hand back `value` when it cannot be tested
    pub fn select<'v>(&self, value: Value<'v>) -> Value<'v> {
        match value {
            Value::Bool(b) => self.pick(b),
            Value::Number(n) => self.pick(n == 1.0),
            other => other,
        }
    }

    fn pick<'v>(&self, cond: bool) -> Value<'v> {
        let text = if cond { &self.if_true } else { &self.if_false };
        Value::Text(text.clone())
    }
}

fn branch<'v>(branches: Option<&Branches>, value: Value<'v>) -> Value<'v> {
    match branches {
        Some(b) => b.select(value),
        None => value,
    }
}

/// One parsed `{...}` expression, nested expressions already resolved
#[derive(Debug, Clone)]
pub(crate) struct Expression {
    pub selector: String,
    pub branches: Option<Branches>,
    pub format: Option<String>,
    pub site: Site,
    pub span: Span,
}

/// A single decimal digit
fn digit_index(segment: &str) -> Option<usize> {
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

impl Resolver<'_> {
    /// Evaluate and stringify an expression
    pub(crate) fn render_expression(
        &self,
        expr: &Expression,
        ctx: &ResolutionContext<'_>,
        depth: usize,
    ) -> ResolveResult<String> {
        let value = self.evaluate(expr, ctx, depth)?;
        let is_source = ctx.is_source_context();
        match &expr.format {
            Some(spec) => format::format_value(&value, spec, is_source).map_err(|reason| {
                ResolveError::InvalidFormat {
                    spec: spec.clone(),
                    reason,
                    span: expr.span.clone(),
                }
            }),
            None => Ok(value.to_text(is_source)),
        }
    }

    pub(crate) fn evaluate<'c>(
        &self,
        expr: &Expression,
        ctx: &ResolutionContext<'c>,
        depth: usize,
    ) -> ResolveResult<Value<'c>> {
        let segments: Vec<&str> = expr.selector.split('.').collect();
        match segments.as_slice() {
            [single] => self.evaluate_single(single, expr, ctx, depth),
            [main, sub] => evaluate_pair(main, sub, expr, ctx),
            [main, field, sub] => evaluate_triple(main, field, sub, expr, ctx),
            _ => Err(ResolveError::SelectorTooLong {
                selector: expr.selector.clone(),
                span: expr.span.clone(),
            }),
        }
    }

    fn evaluate_single<'c>(
        &self,
        segment: &str,
        expr: &Expression,
        ctx: &ResolutionContext<'c>,
        depth: usize,
    ) -> ResolveResult<Value<'c>> {
        match segment {
            "a" => {
                let attr = ctx.attribute().ok_or_else(|| ResolveError::MissingContext {
                    role: ContextRole::Attribute,
                    span: expr.span.clone(),
                })?;
                if expr.branches.is_some() {
                    return Err(ResolveError::invalid_selector(
                        segment,
                        "the attribute itself cannot be branched, select 'a.e' or a slot such as 'a.0'",
                        expr.span.clone(),
                    ));
                }
                Ok(Value::Text(attr.format_self(ctx.is_source_context())))
            }
            "s" | "d" => Err(ResolveError::invalid_selector(
                segment,
                format!("'{}' requires a field, e.g. '{}.range'", segment, segment),
                expr.span.clone(),
            )),
            _ => match digit_index(segment) {
                Some(index) => {
                    let value = ctx.arg(index).cloned().ok_or_else(|| {
                        ResolveError::ArgumentOutOfRange {
                            index,
                            len: ctx.args().len(),
                            span: expr.span.clone(),
                        }
                    })?;
                    Ok(branch(expr.branches.as_ref(), value))
                }
                None => self.expand_key(segment, expr, ctx, depth),
            },
        }
    }

    /// Look up a string-table key and resolve its entry one level deeper.
    ///
    /// A missing key yields the key text and skips the branches.
    fn expand_key<'c>(
        &self,
        key: &str,
        expr: &Expression,
        ctx: &ResolutionContext<'c>,
        depth: usize,
    ) -> ResolveResult<Value<'c>> {
        let Some(template) = self.table().get(key) else {
            tracing::debug!(key, "string table key not found, using key text");
            return Ok(Value::Text(key.to_string()));
        };

        if !expr.site.expands_table() {
            return Ok(Value::Text(key.to_string()));
        }

        if depth > self.config().max_depth {
            tracing::warn!(
                key,
                depth,
                max_depth = self.config().max_depth,
                "string table recursion limit reached"
            );
            return Ok(Value::Text(self.config().recursion_sentinel.clone()));
        }

        tracing::trace!(key, depth, "expanding string table entry");
        let text = self
            .resolve_at(template, ctx, depth + 1)
            .map_err(|err| ResolveError::in_entry(key, template, err))?;
        Ok(branch(expr.branches.as_ref(), Value::Text(text)))
    }
}

fn evaluate_pair<'c>(
    main: &str,
    sub: &str,
    expr: &Expression,
    ctx: &ResolutionContext<'c>,
) -> ResolveResult<Value<'c>> {
    match main {
        "a" => {
            let attr = ctx.attribute().ok_or_else(|| ResolveError::MissingContext {
                role: ContextRole::Attribute,
                span: expr.span.clone(),
            })?;
            select_in_attribute(attr, sub, expr)
        }
        "s" | "d" => match subject_field(main, sub, expr, ctx)? {
            Value::Attribute(attr) => match &expr.branches {
                Some(branches) => {
                    let tested = match attr.enabled() {
                        Some(enabled) => Value::Bool(enabled),
                        None => slot(attr, 0, expr)?,
                    };
                    Ok(branches.select(tested))
                }
                None => Ok(Value::Text(attr.format_self(ctx.is_source_context()))),
            },
            value => Ok(branch(expr.branches.as_ref(), value)),
        },
        _ => Err(invalid_main(main, expr)),
    }
}

fn evaluate_triple<'c>(
    main: &str,
    field: &str,
    sub: &str,
    expr: &Expression,
    ctx: &ResolutionContext<'c>,
) -> ResolveResult<Value<'c>> {
    match main {
        "a" => Err(ResolveError::invalid_selector(
            expr.selector.as_str(),
            "too many sub selectors for the attribute",
            expr.span.clone(),
        )),
        "s" | "d" => match subject_field(main, field, expr, ctx)? {
            Value::Attribute(attr) => select_in_attribute(attr, sub, expr),
            other => Err(ResolveError::invalid_selector(
                expr.selector.as_str(),
                format!(
                    "field '{}' is a {}, only attributes have sub selectors",
                    field,
                    other.kind()
                ),
                expr.span.clone(),
            )),
        },
        _ => Err(invalid_main(main, expr)),
    }
}

fn invalid_main(main: &str, expr: &Expression) -> ResolveError {
    ResolveError::invalid_selector(
        expr.selector.as_str(),
        format!("invalid main selector '{}', expected 'a', 's' or 'd'", main),
        expr.span.clone(),
    )
}

fn subject_field<'c>(
    main: &str,
    field: &str,
    expr: &Expression,
    ctx: &ResolutionContext<'c>,
) -> ResolveResult<Value<'c>> {
    let (role, subject) = if main == "s" {
        (ContextRole::Source, ctx.source())
    } else {
        (ContextRole::Display, ctx.display())
    };
    let subject = subject.ok_or_else(|| ResolveError::MissingContext {
        role,
        span: expr.span.clone(),
    })?;
    subject
        .field(field)
        .ok_or_else(|| ResolveError::MissingField {
            role,
            field: field.to_string(),
            span: expr.span.clone(),
        })
}

/// `e` or a slot digit on an attribute
fn select_in_attribute<'c>(
    attr: &dyn Attribute,
    sub: &str,
    expr: &Expression,
) -> ResolveResult<Value<'c>> {
    if sub == "e" {
        let enabled = attr.enabled().ok_or_else(|| ResolveError::NoEnabledFlag {
            selector: expr.selector.clone(),
            span: expr.span.clone(),
        })?;
        return Ok(branch(expr.branches.as_ref(), Value::Bool(enabled)));
    }

    let index = digit_index(sub).ok_or_else(|| {
        ResolveError::invalid_selector(
            expr.selector.as_str(),
            format!("invalid sub selector '{}', expected 'e' or a slot digit", sub),
            expr.span.clone(),
        )
    })?;
    let value = slot(attr, index, expr)?;
    Ok(branch(expr.branches.as_ref(), value))
}

fn slot(attr: &dyn Attribute, index: usize, expr: &Expression) -> ResolveResult<Value<'static>> {
    let count = attr.slot_count();
    let out_of_range = || ResolveError::SlotOutOfRange {
        selector: expr.selector.clone(),
        slot: index,
        count,
        span: expr.span.clone(),
    };
    if index >= count {
        return Err(out_of_range());
    }
    attr.slot(index).ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branches() -> Branches {
        Branches {
            if_false: "no".to_string(),
            if_true: "yes".to_string(),
        }
    }

    fn text(value: Value<'_>) -> String {
        value.to_text(false)
    }

    #[test]
    fn test_bool_picks_branch() {
        assert_eq!(text(branches().select(Value::Bool(true))), "yes");
        assert_eq!(text(branches().select(Value::Bool(false))), "no");
    }

    #[test]
    fn test_number_equal_to_one_picks_true() {
        assert_eq!(text(branches().select(Value::Number(1.0))), "yes");
        assert_eq!(text(branches().select(Value::Number(2.0))), "no");
        assert_eq!(text(branches().select(Value::Number(0.0))), "no");
        assert_eq!(text(branches().select(Value::Number(0.5))), "no");
    }

    #[test]
    fn test_text_ignores_branches() {
        assert_eq!(text(branches().select(Value::Text("1".into()))), "1");
    }

    #[test]
    fn test_digit_index() {
        assert_eq!(digit_index("0"), Some(0));
        assert_eq!(digit_index("9"), Some(9));
        assert_eq!(digit_index("10"), None);
        assert_eq!(digit_index("x"), None);
        assert_eq!(digit_index(""), None);
    }

    #[test]
    fn test_only_selector_site_skips_expansion() {
        assert!(Site::Entry.expands_table());
        assert!(Site::Branch.expands_table());
        assert!(!Site::Selector.expands_table());
    }
}
