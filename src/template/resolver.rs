//! Template resolution - scans template text and expands its expressions

use crate::config::ResolverConfig;
use crate::error::{ResolveError, ResolveResult, Span};
use crate::table::StringTable;

use super::context::ResolutionContext;
use super::selector::{Branches, Expression, Site};

/// Escape character for both literal text and expressions
pub const ESCAPE: char = '/';

/// Characters that `/` escapes inside an expression. Literal text only
/// escapes `{` and `/`.
fn escapable_in_expression(c: char) -> bool {
    matches!(c, '{' | '}' | '|' | ':' | '?' | ESCAPE)
}

/// Resolves templates against a string table.
///
/// A resolver only reads its table, so one instance can serve concurrent
/// calls from several threads.
///
/// # Example
///
/// ```rust
/// use glossa::{MemoryTable, ResolutionContext, Resolver};
///
/// let table = MemoryTable::new().with("Unit", "{0?units|unit}");
/// let resolver = Resolver::new(&table);
///
/// let ctx = ResolutionContext::new().with_arg(3);
/// assert_eq!(resolver.resolve("{0} {Unit}", &ctx).unwrap(), "3 units");
/// ```
#[derive(Clone)]
pub struct Resolver<'t> {
    table: &'t dyn StringTable,
    config: ResolverConfig,
}

impl<'t> Resolver<'t> {
    /// Create a resolver with the default configuration
    pub fn new(table: &'t dyn StringTable) -> Self {
        Self {
            table,
            config: ResolverConfig::default(),
        }
    }

    /// Use a custom configuration
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Settings this resolver was built with
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The string table keys are looked up in
    pub fn table(&self) -> &'t dyn StringTable {
        self.table
    }

    /// Check if the table has an entry for `key`
    pub fn has_key(&self, key: &str) -> bool {
        self.table.contains(key)
    }

    /// Resolve a template. Fatal errors abort the whole call.
    pub fn resolve(&self, template: &str, ctx: &ResolutionContext<'_>) -> ResolveResult<String> {
        self.resolve_at(template, ctx, 0)
    }

    /// Resolve the entry stored under `key`, or return `key` when absent
    pub fn resolve_by_key(&self, key: &str, ctx: &ResolutionContext<'_>) -> ResolveResult<String> {
        Ok(self
            .try_resolve_by_key(key, ctx)?
            .unwrap_or_else(|| key.to_string()))
    }

    /// Resolve the entry stored under `key`, or return `default` when absent
    pub fn resolve_by_key_or(
        &self,
        key: &str,
        default: &str,
        ctx: &ResolutionContext<'_>,
    ) -> ResolveResult<String> {
        Ok(self
            .try_resolve_by_key(key, ctx)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Resolve the entry stored under `key`, `None` when absent
    pub fn try_resolve_by_key(
        &self,
        key: &str,
        ctx: &ResolutionContext<'_>,
    ) -> ResolveResult<Option<String>> {
        match self.table.get(key) {
            Some(template) => self
                .resolve(template, ctx)
                .map(Some)
                .map_err(|err| ResolveError::in_entry(key, template, err)),
            None => Ok(None),
        }
    }

    pub(crate) fn resolve_at(
        &self,
        template: &str,
        ctx: &ResolutionContext<'_>,
        depth: usize,
    ) -> ResolveResult<String> {
        let chars: Vec<char> = template.chars().collect();
        let scanner = Scanner {
            resolver: self,
            ctx,
            chars: &chars,
        };
        scanner.literal(depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Selector,
    FalseBranch,
    TrueBranch,
}

/// Character scanner over one template text
struct Scanner<'s, 't, 'c> {
    resolver: &'s Resolver<'t>,
    ctx: &'s ResolutionContext<'c>,
    chars: &'s [char],
}

impl Scanner<'_, '_, '_> {
    fn unterminated(&self, open: usize) -> ResolveError {
        ResolveError::UnterminatedExpression {
            span: open..self.chars.len(),
        }
    }

    /// Literal text: copy characters, expand `{...}`
    fn literal(&self, depth: usize) -> ResolveResult<String> {
        let mut out = String::with_capacity(self.chars.len());
        let mut i = 0;
        while let Some(&c) = self.chars.get(i) {
            match c {
                ESCAPE => match self.chars.get(i + 1) {
                    Some(&next) if next == '{' || next == ESCAPE => {
                        out.push(next);
                        i += 2;
                    }
                    Some(_) => {
                        out.push(ESCAPE);
                        i += 1;
                    }
                    None => return Err(ResolveError::DanglingEscape { span: i..i + 1 }),
                },
                '{' => {
                    let (text, close) = self.expression(i, Site::Entry, depth, 0)?;
                    out.push_str(&text);
                    i = close + 1;
                }
                c => {
                    out.push(c);
                    i += 1;
                }
            }
        }
        Ok(out)
    }

    /// Scan the expression opened at `open` and resolve it.
    ///
    /// Returns the resolved text and the index of the closing `}`.
    fn expression(
        &self,
        open: usize,
        site: Site,
        depth: usize,
        nesting: usize,
    ) -> ResolveResult<(String, usize)> {
        let mut stage = Stage::Selector;
        let mut current = String::new();
        let mut selector = String::new();
        let mut if_false = String::new();

        let mut i = open + 1;
        loop {
            let Some(&c) = self.chars.get(i) else {
                return Err(self.unterminated(open));
            };
            match c {
                ESCAPE => match self.chars.get(i + 1) {
                    Some(&next) if escapable_in_expression(next) => {
                        current.push(next);
                        i += 2;
                    }
                    Some(_) => {
                        current.push(ESCAPE);
                        i += 1;
                    }
                    None => return Err(self.unterminated(open)),
                },
                '{' => {
                    let nested = if stage == Stage::Selector {
                        Site::Selector
                    } else {
                        Site::Branch
                    };
                    let max = self.resolver.config().max_nesting;
                    if nesting >= max {
                        return Err(ResolveError::NestingTooDeep { max, span: i..i + 1 });
                    }
                    let (text, close) = self.expression(i, nested, depth + 1, nesting + 1)?;
                    current.push_str(&text);
                    i = close + 1;
                }
                '?' if stage == Stage::Selector => {
                    selector = std::mem::take(&mut current);
                    stage = Stage::FalseBranch;
                    i += 1;
                }
                '|' if stage == Stage::FalseBranch => {
                    if_false = std::mem::take(&mut current);
                    stage = Stage::TrueBranch;
                    i += 1;
                }
                ':' if stage != Stage::FalseBranch => {
                    let (spec, close) = self.format_spec(open, i + 1)?;
                    let parts = Parts {
                        stage,
                        selector,
                        if_false,
                        current,
                    };
                    let text = self.finish(parts, Some(spec), site, open..close + 1, depth)?;
                    return Ok((text, close));
                }
                '}' => {
                    let parts = Parts {
                        stage,
                        selector,
                        if_false,
                        current,
                    };
                    let text = self.finish(parts, None, site, open..i + 1, depth)?;
                    return Ok((text, i));
                }
                c => {
                    current.push(c);
                    i += 1;
                }
            }
        }
    }

    /// Raw format specifier up to the closing `}`; only `/}` is unescaped
    fn format_spec(&self, open: usize, start: usize) -> ResolveResult<(String, usize)> {
        let mut spec = String::new();
        let mut i = start;
        loop {
            match self.chars.get(i) {
                None => return Err(self.unterminated(open)),
                Some(&ESCAPE) => match self.chars.get(i + 1) {
                    Some(&'}') => {
                        spec.push('}');
                        i += 2;
                    }
                    Some(_) => {
                        spec.push(ESCAPE);
                        i += 1;
                    }
                    None => return Err(self.unterminated(open)),
                },
                Some(&'}') => return Ok((spec, i)),
                Some(&c) => {
                    spec.push(c);
                    i += 1;
                }
            }
        }
    }

    fn finish(
        &self,
        parts: Parts,
        format: Option<String>,
        site: Site,
        span: Span,
        depth: usize,
    ) -> ResolveResult<String> {
        let (selector, branches) = match parts.stage {
            Stage::Selector => (parts.current, None),
            Stage::FalseBranch => {
                return Err(ResolveError::IncompleteBranch {
                    selector: parts.selector,
                    span,
                })
            }
            Stage::TrueBranch => (
                parts.selector,
                Some(Branches {
                    if_false: parts.if_false,
                    if_true: parts.current,
                }),
            ),
        };

        let expr = Expression {
            selector,
            branches,
            format,
            site,
            span,
        };
        self.resolver.render_expression(&expr, self.ctx, depth)
    }
}

/// Buffers collected for one expression
struct Parts {
    stage: Stage,
    selector: String,
    if_false: String,
    current: String,
}
