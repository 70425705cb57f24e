//! Glossa - a localized string-template resolver
//!
//! Templates mix literal text with `{...}` expressions that read positional
//! arguments, fields on a source and a display subject, multi-slot
//! attributes, and other entries of a string table. Entries may reference
//! each other (even themselves); expansion stops at a fixed depth and leaves
//! a sentinel behind.
//!
//! # Example
//!
//! ```rust
//! use glossa::{FieldMap, MemoryTable, ResolutionContext, Resolver, SlotAttribute};
//!
//! let table = MemoryTable::new()
//!     .with("Range", "Range: {d.range.e?none|{d.range.0}}")
//!     .with("Charges", "{d.charges.0} {d.charges.0?charges|charge}");
//!
//! let unit = FieldMap::new()
//!     .with_attribute("range", SlotAttribute::toggle(true, [5]))
//!     .with_attribute("charges", SlotAttribute::new([1, 3]));
//!
//! let resolver = Resolver::new(&table);
//! let ctx = ResolutionContext::new().with_display(&unit);
//!
//! assert_eq!(resolver.resolve_by_key("Range", &ctx).unwrap(), "Range: 5");
//! assert_eq!(resolver.resolve_by_key("Charges", &ctx).unwrap(), "1 charge");
//! ```

pub mod attribute;
pub mod config;
pub mod error;
pub mod subject;
pub mod table;
pub mod template;
pub mod value;

pub use attribute::{Attribute, SlotAttribute};
pub use config::ResolverConfig;
pub use error::{ContextRole, ResolveError, ResolveResult};
pub use subject::{FieldMap, Subject};
pub use table::{MemoryTable, StringTable, TableError};
pub use template::{ResolutionContext, Resolver};
pub use value::Value;

/// Resolve `template` against `table` with the default configuration
///
/// # Example
///
/// ```rust
/// use glossa::{resolve, MemoryTable, ResolutionContext};
///
/// let table = MemoryTable::new();
/// let ctx = ResolutionContext::new().with_arg(3.0);
/// assert_eq!(resolve("{0:F2}", &table, &ctx).unwrap(), "3.00");
/// ```
pub fn resolve(
    template: &str,
    table: &dyn StringTable,
    ctx: &ResolutionContext<'_>,
) -> ResolveResult<String> {
    Resolver::new(table).resolve(template, ctx)
}

/// Resolve the entry stored under `key`, falling back to `key` itself
pub fn resolve_by_key(
    key: &str,
    table: &dyn StringTable,
    ctx: &ResolutionContext<'_>,
) -> ResolveResult<String> {
    Resolver::new(table).resolve_by_key(key, ctx)
}
