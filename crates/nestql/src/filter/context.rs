use crate::schema::{Collection, Field, Relation, RelationType};

/// What the walker knows about the entry it is visiting.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// The collection the entry's key belongs to.
    pub collection: &'a Collection,

    /// The field named by the key, if the collection has it.
    pub field: Option<&'a Field>,

    pub relation: Option<&'a Relation>,
    pub relation_type: Option<RelationType>,

    /// For to-many relations, whether some or no related item must match.
    pub quantity: Option<Quantity>,

    /// `true` when the entry compares a value rather than descending into a
    /// related collection.
    pub leaf: bool,

    /// Field names from the root collection down to this entry.
    pub path: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// At least one related item matches (`_some`, the default).
    Some,

    /// No related item matches (`_none`).
    None,
}

impl Quantity {
    pub fn key(self) -> &'static str {
        match self {
            Quantity::Some => "_some",
            Quantity::None => "_none",
        }
    }

    pub(crate) fn from_key(key: &str) -> Option<Quantity> {
        match key {
            "_some" => Some(Quantity::Some),
            "_none" => Some(Quantity::None),
            _ => None,
        }
    }
}

impl FilterContext<'_> {
    /// The path joined with dots, e.g. `author.company.name`.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}
