use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Json,
    Uuid,
    DateTime,

    /// No backing column. One-to-many and one-to-any fields are aliases.
    Alias,
}

impl FieldType {
    pub fn is_alias(self) -> bool {
        matches!(self, FieldType::Alias)
    }
}
