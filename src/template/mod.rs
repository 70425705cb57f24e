//! Template resolution
//!
//! Templates are text with embedded `{...}` expressions. `/` escapes: in
//! literal text `//` and `/{`; inside an expression any of `{ } | : ? /`.
//!
//! # Example
//!
//! ```text
//! {d.range}                      -> "2/5"       attribute, self-formatted
//! {d.range.0}                    -> "2"         first slot
//! {d.range.e?disabled|enabled}   -> "enabled"   enabled flag
//! {d.charges.0?charges|charge}   -> "charge"    exactly one
//! {0:F2}                         -> "3.00"      format specifier
//! {Title_{d.kind}}               -> entry "Title_Spell", expanded
//! ```

mod context;
mod format;
mod resolver;
mod selector;

pub use context::ResolutionContext;
pub use resolver::{Resolver, ESCAPE};
