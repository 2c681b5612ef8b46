use super::FieldNode;

use serde::{Deserialize, Serialize};

/// How a nested collection is reached from the current one.
///
/// `local_fields[i]` pairs with `foreign_fields[i]`; the order is the key
/// order and must agree on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nesting {
    pub local_fields: Vec<String>,
    pub foreign_collection: String,
    pub foreign_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionOneNesting {
    /// JSON discriminator column on the current collection.
    pub field: String,
    pub collections: Vec<UnionCollection>,
}

/// A candidate target of an any-to-one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionCollection {
    pub collection: String,
    pub identifier_fields: Vec<String>,
    pub fields: Vec<FieldNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionManyNesting {
    /// Identifier fields of the current collection, referenced by the
    /// targets' discriminators.
    pub identifier_fields: Vec<String>,
    pub collections: Vec<UnionManyCollection>,
}

/// A target of a one-to-any field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionManyCollection {
    pub collection: String,

    /// JSON discriminator column on `collection`.
    pub field: String,

    pub identifier_fields: Vec<String>,
    pub fields: Vec<FieldNode>,

    /// Collection name the discriminators store. Defaults to `collection`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_collection: Option<String>,
}

impl Nesting {
    pub fn new<L, F, S, T>(
        local_fields: L,
        foreign_collection: impl Into<String>,
        foreign_fields: F,
    ) -> Nesting
    where
        L: IntoIterator<Item = S>,
        F: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Nesting {
            local_fields: local_fields.into_iter().map(Into::into).collect(),
            foreign_collection: foreign_collection.into(),
            foreign_fields: foreign_fields.into_iter().map(Into::into).collect(),
        }
    }
}
