mod builder;
pub use builder::{Builder, CollectionBuilder};

mod collection;
pub use collection::Collection;

mod field;
pub use field::{Field, FieldType};

mod relation;
pub use relation::Relation;

mod relation_info;
pub use relation_info::{RelationInfo, RelationType};

mod verify;

use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The collections a query can read and the relations between them.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub collections: IndexMap<String, Collection>,
    pub relations: Vec<Relation>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    /// Returns the collection or an invalid query error naming it.
    pub fn require_collection(&self, name: &str) -> Result<&Collection> {
        self.collection(name)
            .ok_or_else(|| crate::Error::invalid_query(format!("unknown collection `{name}`")))
    }

    /// Resolves which relation, if any, connects `collection.field`.
    ///
    /// The lookup is deterministic: the many side of a relation is checked
    /// before the one side, and relations are checked in declaration order.
    pub fn relation_info(&self, collection: &str, field: &str) -> Option<RelationInfo<'_>> {
        for relation in &self.relations {
            if relation.collection == collection && relation.field == field {
                let ty = if relation.related_collection.is_some() {
                    RelationType::M2o
                } else {
                    RelationType::A2o
                };
                return Some(RelationInfo { relation, ty });
            }
        }

        for relation in &self.relations {
            if relation.one_field.as_deref() != Some(field) {
                continue;
            }

            match &relation.related_collection {
                Some(related) if related == collection => {
                    return Some(RelationInfo {
                        relation,
                        ty: RelationType::O2m,
                    });
                }
                None if relation.allows_collection(collection) => {
                    return Some(RelationInfo {
                        relation,
                        ty: RelationType::O2a,
                    });
                }
                _ => {}
            }
        }

        None
    }

    /// Every a2o relation that exposes `field` as a one-to-any alias on
    /// `collection`, one per target collection, in declaration order.
    pub fn o2a_relations(&self, collection: &str, field: &str) -> Vec<&Relation> {
        self.relations
            .iter()
            .filter(|relation| {
                relation.related_collection.is_none()
                    && relation.one_field.as_deref() == Some(field)
                    && relation.allows_collection(collection)
            })
            .collect()
    }
}
