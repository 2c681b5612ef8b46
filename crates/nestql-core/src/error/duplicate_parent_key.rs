use super::Error;

/// Error when two parent items share a primary key while attaching a
/// one-to-many relation. The attach target would be ambiguous.
#[derive(Debug)]
pub(super) struct DuplicateParentKey {
    collection: Box<str>,
    key: Box<str>,
}

impl std::error::Error for DuplicateParentKey {}

impl core::fmt::Display for DuplicateParentKey {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "duplicate parent key: more than one `{}` item has primary key `{}`",
            self.collection, self.key
        )
    }
}

impl Error {
    /// Creates a duplicate parent key error.
    pub fn duplicate_parent_key(collection: impl Into<String>, key: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateParentKey(DuplicateParentKey {
            collection: collection.into().into(),
            key: key.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate parent key error.
    pub fn is_duplicate_parent_key(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DuplicateParentKey(_))
    }
}
