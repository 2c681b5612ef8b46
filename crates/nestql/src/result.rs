//! Turns flat rows and sub-query results back into nested items.

mod key;

mod map;
pub use map::map_result;

mod merge;
pub use merge::{merge_with_parent_items, FieldAllowed, NestedItems};

mod node;
pub use node::{NestedCollectionNode, NestedKind};

mod paginate;
pub use paginate::apply_nested_modifiers;

mod version;
pub use version::{merge_versions_raw, merge_versions_recursive};
