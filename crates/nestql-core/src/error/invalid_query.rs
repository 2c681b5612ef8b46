use super::Error;

/// Error when a request or filter cannot be interpreted.
///
/// This occurs when:
/// - An `_and` / `_or` filter value is not an array
/// - A polymorphic filter branch omits its `field:collection` scope
/// - A filter uses an unknown operator or an operand of the wrong shape
/// - A request names a field the collection does not have
/// - A request nests deeper than the configured maximum
#[derive(Debug)]
pub(super) struct InvalidQuery {
    message: Box<str>,
}

impl std::error::Error for InvalidQuery {}

impl core::fmt::Display for InvalidQuery {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid query: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidQuery(InvalidQuery {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid query error.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidQuery(_))
    }
}
