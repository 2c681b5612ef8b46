use serde::{Deserialize, Serialize};

/// A relation between two collections, described from its many side.
///
/// `collection` holds the foreign key columns. For a many-to-one relation
/// `related_collection` names the referenced collection and
/// `related_fields` its key columns. An any-to-one relation has no
/// `related_collection`: `fields[0]` is a JSON discriminator column holding
/// `{ "foreignCollection": .., "foreignKey": [{ "column": .., "value": .. }] }`
/// and the candidates are listed in `one_allowed_collections`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub collection: String,

    /// The relational field on `collection`.
    pub field: String,

    /// Foreign key columns on `collection`, in key order.
    pub fields: Vec<String>,

    pub related_collection: Option<String>,

    /// Key columns on `related_collection`, paired with `fields`.
    pub related_fields: Vec<String>,

    /// Alias field exposing the reverse side (one-to-many, or one-to-any for
    /// any-to-one relations).
    pub one_field: Option<String>,

    /// Field on `collection` naming the target collection of an any-to-one
    /// reference when items carry it outside the discriminator.
    pub one_collection_field: Option<String>,

    pub one_allowed_collections: Vec<String>,

    /// Field used to order the one-to-many side when a query gives no sort.
    pub sort_field: Option<String>,
}

impl Relation {
    /// A many-to-one relation from `collection.field` to the primary key of
    /// `related_collection`.
    pub fn m2o(
        collection: impl Into<String>,
        field: impl Into<String>,
        related_collection: impl Into<String>,
    ) -> Relation {
        let field = field.into();
        Relation {
            collection: collection.into(),
            fields: vec![field.clone()],
            field,
            related_collection: Some(related_collection.into()),
            related_fields: vec![],
            one_field: None,
            one_collection_field: None,
            one_allowed_collections: vec![],
            sort_field: None,
        }
    }

    /// An any-to-one relation stored in the JSON column `collection.field`.
    pub fn a2o<I, S>(collection: impl Into<String>, field: impl Into<String>, allowed: I) -> Relation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        Relation {
            collection: collection.into(),
            fields: vec![field.clone()],
            field,
            related_collection: None,
            related_fields: vec![],
            one_field: None,
            one_collection_field: None,
            one_allowed_collections: allowed.into_iter().map(Into::into).collect(),
            sort_field: None,
        }
    }

    /// Overrides the foreign key columns, for composite keys.
    pub fn fields<I, S>(mut self, fields: I) -> Relation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the referenced key columns. Defaults to the related primary key.
    pub fn related_fields<I, S>(mut self, fields: I) -> Relation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn one_field(mut self, name: impl Into<String>) -> Relation {
        self.one_field = Some(name.into());
        self
    }

    pub fn one_collection_field(mut self, name: impl Into<String>) -> Relation {
        self.one_collection_field = Some(name.into());
        self
    }

    pub fn sort_field(mut self, name: impl Into<String>) -> Relation {
        self.sort_field = Some(name.into());
        self
    }

    pub fn is_a2o(&self) -> bool {
        self.related_collection.is_none()
    }

    pub fn allows_collection(&self, collection: &str) -> bool {
        self.one_allowed_collections
            .iter()
            .any(|allowed| allowed == collection)
    }

    /// The JSON discriminator column of an any-to-one relation.
    pub fn discriminator(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or(&self.field)
    }
}
