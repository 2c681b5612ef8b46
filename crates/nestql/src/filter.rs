//! Filter trees: the schema-aware walker used to inspect and rewrite them,
//! and their conversion into WHERE conditions.
//!
//! A filter is a JSON object. Keys are field names (optionally scoped as
//! `field:collection`), logical groups (`_and`, `_or`), or operators such
//! as `_eq`.

mod context;
pub use context::{FilterContext, Quantity};

mod convert;
pub(crate) use convert::to_expr;

mod walk;
pub use walk::deep_map_filter;

/// Keys starting with `_` are operators, logical groups, or quantifiers.
pub(crate) fn is_operator(key: &str) -> bool {
    key.starts_with('_')
}

/// Splits `field:collection` into its parts.
pub(crate) fn split_scope(key: &str) -> (&str, Option<&str>) {
    match key.split_once(':') {
        Some((field, scope)) => (field, Some(scope)),
        None => (key, None),
    }
}
