use super::Error;

/// Error when a field is used as a relation but the schema defines no
/// relation for it.
#[derive(Debug)]
pub(super) struct MissingRelation {
    collection: Box<str>,
    field: Box<str>,
}

impl std::error::Error for MissingRelation {}

impl core::fmt::Display for MissingRelation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "missing relation: no relation for field `{}` on collection `{}`",
            self.field, self.collection
        )
    }
}

impl Error {
    /// Creates a missing relation error for `collection.field`.
    pub fn missing_relation(collection: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingRelation(MissingRelation {
            collection: collection.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is a missing relation error.
    pub fn is_missing_relation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MissingRelation(_))
    }
}
