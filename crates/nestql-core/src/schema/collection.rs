use super::Field;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,

    /// Primary key fields, in key order.
    pub primary: Vec<String>,

    pub fields: IndexMap<String, Field>,
}

impl Collection {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields backed by a column, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|field| !field.ty.is_alias())
    }

    pub fn is_primary(&self, field: &str) -> bool {
        self.primary.iter().any(|name| name == field)
    }
}
