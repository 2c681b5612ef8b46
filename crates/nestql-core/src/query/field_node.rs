use super::{Modifiers, Nesting, UnionManyNesting, UnionOneNesting};

use serde::{Deserialize, Serialize};

/// One requested output field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldNode {
    /// A column of the current collection.
    Primitive { field: String, alias: String },

    /// A value inside a JSON column of the current collection.
    JsonPath {
        field: String,
        path: Vec<String>,
        alias: String,
    },

    /// Many-to-one: a single related item, joined into the same row.
    NestedOne {
        alias: String,
        fields: Vec<FieldNode>,
        nesting: Nesting,
    },

    /// One-to-many: related items fetched by a deferred query per row.
    NestedMany {
        alias: String,
        fields: Vec<FieldNode>,
        nesting: Nesting,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Any-to-one: a single item from one of several collections, joined
    /// through a JSON discriminator.
    NestedUnionOne {
        alias: String,
        nesting: UnionOneNesting,
    },

    /// One-to-any: items from several collections whose discriminators point
    /// at the current row, one deferred query per collection.
    NestedUnionMany {
        alias: String,
        nesting: UnionManyNesting,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl FieldNode {
    pub fn primitive(field: impl Into<String>) -> FieldNode {
        let field = field.into();
        FieldNode::Primitive {
            alias: field.clone(),
            field,
        }
    }

    /// The key this node is written under in the output item.
    pub fn alias(&self) -> &str {
        match self {
            FieldNode::Primitive { alias, .. }
            | FieldNode::JsonPath { alias, .. }
            | FieldNode::NestedOne { alias, .. }
            | FieldNode::NestedMany { alias, .. }
            | FieldNode::NestedUnionOne { alias, .. }
            | FieldNode::NestedUnionMany { alias, .. } => alias,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, FieldNode::Primitive { .. } | FieldNode::JsonPath { .. })
    }
}
