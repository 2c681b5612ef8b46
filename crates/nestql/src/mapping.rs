//! Records how compiled columns and sub-query results map back onto the
//! requested output shape.
//!
//! A mapping is built once per compiled query and reused for every row that
//! query returns.

use crate::stmt::ColumnIndex;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AliasMapping {
    /// Copy one column into the output under `alias`.
    Root { alias: String, column: ColumnIndex },

    /// A related item joined into the same row.
    ///
    /// `identifiers` are the related item's key columns; when all of them
    /// are null the join found nothing and the output is `null`.
    Nested {
        alias: String,
        identifiers: Vec<ColumnIndex>,
        children: Vec<AliasMapping>,
    },

    /// The result of the deferred sub-query at `index`.
    Sub { alias: String, index: usize },

    /// A polymorphic related item: at most one branch matches per row.
    NestedA2o {
        alias: String,
        discriminator: ColumnIndex,
        collections: Vec<A2oMapping>,
    },
}

/// One candidate collection of a [`AliasMapping::NestedA2o`] entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A2oMapping {
    pub collection: String,
    pub identifiers: Vec<ColumnIndex>,
    pub mapping: Vec<AliasMapping>,
}

impl AliasMapping {
    pub fn root(alias: impl Into<String>, column: ColumnIndex) -> AliasMapping {
        AliasMapping::Root {
            alias: alias.into(),
            column,
        }
    }

    pub fn alias(&self) -> &str {
        match self {
            AliasMapping::Root { alias, .. }
            | AliasMapping::Nested { alias, .. }
            | AliasMapping::Sub { alias, .. }
            | AliasMapping::NestedA2o { alias, .. } => alias,
        }
    }
}
