use super::Relation;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// Many-to-one: the field holds a foreign key.
    M2o,

    /// One-to-many: the field is an alias for the items referencing this one.
    O2m,

    /// Any-to-one: the field holds a JSON reference to an item in one of
    /// several collections.
    A2o,

    /// One-to-any: the field is an alias for items in several collections
    /// whose any-to-one references point at this one.
    O2a,
}

/// A relation as seen from one of its fields.
#[derive(Debug, Clone, Copy)]
pub struct RelationInfo<'a> {
    pub relation: &'a Relation,
    pub ty: RelationType,
}

impl<'a> RelationInfo<'a> {
    /// The collection reached by following the field, when it is fixed by the
    /// schema.
    pub fn target(&self) -> Option<&'a str> {
        match self.ty {
            RelationType::M2o => self.relation.related_collection.as_deref(),
            RelationType::O2m | RelationType::O2a => Some(&self.relation.collection),
            RelationType::A2o => None,
        }
    }

    /// Key columns on the side the field belongs to.
    pub fn local_fields(&self) -> &'a [String] {
        match self.ty {
            RelationType::M2o | RelationType::A2o => &self.relation.fields,
            RelationType::O2m | RelationType::O2a => &self.relation.related_fields,
        }
    }

    /// Key columns on the side the field leads to.
    pub fn foreign_fields(&self) -> &'a [String] {
        match self.ty {
            RelationType::M2o | RelationType::A2o => &self.relation.related_fields,
            RelationType::O2m | RelationType::O2a => &self.relation.fields,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self.ty, RelationType::O2m | RelationType::O2a)
    }
}
