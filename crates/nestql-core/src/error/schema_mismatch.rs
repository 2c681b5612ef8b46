use super::Error;

/// Error when the two sides of a relation do not line up.
///
/// This occurs when:
/// - A relation declares a different number of local and foreign key fields
/// - A relation declares no key fields at all
/// - A deferred query receives a different number of key values than its
///   relation has key fields
///
/// Raised while compiling; no partial result is produced.
#[derive(Debug)]
pub(super) struct SchemaMismatch {
    message: Box<str>,
}

impl std::error::Error for SchemaMismatch {}

impl core::fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "schema mismatch: {}", self.message)
    }
}

impl Error {
    /// Creates a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::SchemaMismatch(SchemaMismatch {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a schema mismatch error.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::SchemaMismatch(_))
    }
}
