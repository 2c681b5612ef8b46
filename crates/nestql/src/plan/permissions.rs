use indexmap::{IndexMap, IndexSet};

/// Which collections and fields a caller may read.
///
/// Forbidden fields are dropped from a plan rather than rejected, so the
/// same request can serve callers with different access.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Permissions {
    admin: bool,
    collections: IndexMap<String, AllowedFields>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AllowedFields {
    All,
    Only(IndexSet<String>),
}

impl Permissions {
    /// Nothing is readable until allowed.
    pub fn new() -> Permissions {
        Permissions::default()
    }

    /// Everything is readable.
    pub fn admin() -> Permissions {
        Permissions {
            admin: true,
            collections: IndexMap::new(),
        }
    }

    pub fn allow_all(&mut self, collection: impl Into<String>) -> &mut Self {
        self.collections.insert(collection.into(), AllowedFields::All);
        self
    }

    /// Allows `fields` on `collection`, adding to any fields allowed before.
    pub fn allow<I, S>(&mut self, collection: impl Into<String>, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into);

        match self
            .collections
            .entry(collection.into())
            .or_insert_with(|| AllowedFields::Only(IndexSet::new()))
        {
            AllowedFields::All => {}
            AllowedFields::Only(allowed) => allowed.extend(fields),
        }

        self
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn allows_collection(&self, collection: &str) -> bool {
        self.admin || self.collections.contains_key(collection)
    }

    pub fn allows_field(&self, collection: &str, field: &str) -> bool {
        if self.admin {
            return true;
        }

        match self.collections.get(collection) {
            Some(AllowedFields::All) => true,
            Some(AllowedFields::Only(fields)) => fields.contains(field),
            None => false,
        }
    }
}
