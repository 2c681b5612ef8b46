use crate::stmt::Value;

use serde::{Deserialize, Serialize};

pub(super) const FOREIGN_COLLECTION: &str = "foreignCollection";
pub(super) const FOREIGN_KEY: &str = "foreignKey";
pub(super) const VALUE: &str = "value";

/// The value stored in an any-to-one discriminator column.
///
/// ```json
/// { "foreignKey": [{ "column": "id", "value": 42 }], "foreignCollection": "posts" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2oReference {
    pub foreign_key: Vec<ForeignKeyPart>,
    pub foreign_collection: String,
}

/// One column of a (possibly composite) key inside an [`A2oReference`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyPart {
    pub column: String,
    pub value: Value,
}

impl A2oReference {
    pub fn new<'a>(
        collection: impl Into<String>,
        columns: impl IntoIterator<Item = &'a String>,
        values: impl IntoIterator<Item = &'a Value>,
    ) -> A2oReference {
        A2oReference {
            foreign_key: columns
                .into_iter()
                .zip(values)
                .map(|(column, value)| ForeignKeyPart {
                    column: column.clone(),
                    value: value.clone(),
                })
                .collect(),
            foreign_collection: collection.into(),
        }
    }

    /// Reads a reference out of a discriminator value, if it has the right
    /// shape. Drivers that return JSON columns as text are accepted too.
    pub fn from_value(value: &Value) -> Option<A2oReference> {
        match value {
            Value::String(text) => serde_json::from_str(text).ok(),
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}
