//! The database-agnostic description of a nested read.

mod field_node;
pub use field_node::FieldNode;

mod limit;
pub use limit::Limit;

mod modifiers;
pub use modifiers::Modifiers;

mod nesting;
pub use nesting::{Nesting, UnionCollection, UnionManyCollection, UnionManyNesting, UnionOneNesting};

mod sort;
pub use sort::Sort;

use serde::{Deserialize, Serialize};

/// A read of `collection` returning the shape described by `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractQuery {
    pub collection: String,
    pub fields: Vec<FieldNode>,

    #[serde(default)]
    pub modifiers: Modifiers,
}

impl AbstractQuery {
    pub fn new(collection: impl Into<String>, fields: Vec<FieldNode>) -> AbstractQuery {
        AbstractQuery {
            collection: collection.into(),
            fields,
            modifiers: Modifiers::default(),
        }
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> AbstractQuery {
        self.modifiers = modifiers;
        self
    }
}
