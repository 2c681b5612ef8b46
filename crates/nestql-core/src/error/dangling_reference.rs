use super::Error;

/// Error when a nested item points at a parent that is not part of the
/// current batch. Usually means the parent and nested reads saw different
/// snapshots.
#[derive(Debug)]
pub(super) struct DanglingReference {
    collection: Box<str>,
    field: Box<str>,
    key: Box<str>,
}

impl std::error::Error for DanglingReference {}

impl core::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "dangling reference: `{}` item references missing parent `{}` through `{}`",
            self.collection, self.key, self.field
        )
    }
}

impl Error {
    /// Creates a dangling reference error.
    pub fn dangling_reference(
        collection: impl Into<String>,
        field: impl Into<String>,
        key: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::DanglingReference(DanglingReference {
            collection: collection.into().into(),
            field: field.into().into(),
            key: key.into().into(),
        }))
    }

    /// Returns `true` if this error is a dangling reference error.
    pub fn is_dangling_reference(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::DanglingReference(_))
    }
}
