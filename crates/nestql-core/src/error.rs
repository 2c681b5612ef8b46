mod adhoc;
mod dangling_reference;
mod driver;
mod duplicate_parent_key;
mod invalid_query;
mod invalid_result;
mod invalid_schema;
mod missing_relation;
mod schema_mismatch;

use adhoc::AdhocError;
use dangling_reference::DanglingReference;
use driver::DriverError;
use duplicate_parent_key::DuplicateParentKey;
use invalid_query::InvalidQuery;
use invalid_result::InvalidResult;
use invalid_schema::InvalidSchema;
use missing_relation::MissingRelation;
use schema_mismatch::SchemaMismatch;
use std::sync::Arc;

/// Returns early with an ad-hoc error built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while planning, compiling, executing, or reassembling a
/// query.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }

        match err.inner.as_mut().and_then(Arc::get_mut) {
            Some(inner) if inner.cause.is_none() => {
                inner.cause = Some(self);
                err
            }
            // The consequent is shared or already has a cause; attach to a
            // fresh copy of its message instead.
            _ => self.context_impl(Error::from_args(format_args!("{}", err))),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Driver(DriverError),
    SchemaMismatch(SchemaMismatch),
    MissingRelation(MissingRelation),
    InvalidQuery(InvalidQuery),
    InvalidSchema(InvalidSchema),
    InvalidResult(InvalidResult),
    DuplicateParentKey(DuplicateParentKey),
    DanglingReference(DanglingReference),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            SchemaMismatch(err) => core::fmt::Display::fmt(err, f),
            MissingRelation(err) => core::fmt::Display::fmt(err, f),
            InvalidQuery(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            InvalidResult(err) => core::fmt::Display::fmt(err, f),
            DuplicateParentKey(err) => core::fmt::Display::fmt(err, f),
            DanglingReference(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown nestql error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("bad alias: {}", "c9"));
        assert_eq!(err.to_string(), "bad alias: c9");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::schema_mismatch("2 local fields, 1 foreign field");
        let chained = root
            .context(err!("compiling `author`"))
            .context(err!("compiling `articles`"));

        assert_eq!(
            chained.to_string(),
            "compiling `articles`: compiling `author`: schema mismatch: 2 local fields, 1 foreign field"
        );
    }

    #[test]
    fn context_keeps_root_kind_reachable() {
        let err = Error::missing_relation("articles", "tags").context(err!("planning request"));
        assert!(!err.is_missing_relation());
        assert!(err.chain().any(Error::is_missing_relation));
    }

    #[test]
    fn anyhow_bridge() {
        let our_err: Error = anyhow::anyhow!("connection reset").into();
        assert_eq!(our_err.to_string(), "connection reset");
    }

    #[test]
    fn serde_json_bridge() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let our_err: Error = json_err.into();
        assert!(our_err.to_string().contains("EOF"));
    }

    #[test]
    fn missing_relation_error() {
        let err = Error::missing_relation("articles", "tags");
        assert!(err.is_missing_relation());
        assert_eq!(
            err.to_string(),
            "missing relation: no relation for field `tags` on collection `articles`"
        );
    }

    #[test]
    fn invalid_query_error() {
        let err = Error::invalid_query("`_and` expects an array");
        assert!(err.is_invalid_query());
        assert!(!err.is_schema_mismatch());
        assert_eq!(err.to_string(), "invalid query: `_and` expects an array");
    }

    #[test]
    fn duplicate_parent_key_error() {
        let err = Error::duplicate_parent_key("articles", "42");
        assert!(err.is_duplicate_parent_key());
        assert_eq!(
            err.to_string(),
            "duplicate parent key: more than one `articles` item has primary key `42`"
        );
    }

    #[test]
    fn dangling_reference_error() {
        let err = Error::dangling_reference("comments", "article", "7");
        assert!(err.is_dangling_reference());
        assert_eq!(
            err.to_string(),
            "dangling reference: `comments` item references missing parent `7` through `article`"
        );
    }

    #[test]
    fn driver_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = Error::driver(io);
        assert!(err.is_driver());
        assert_eq!(err.to_string(), "socket closed");
    }

    #[test]
    fn unknown_error_display() {
        let err = Error { inner: None };
        assert_eq!(err.to_string(), "unknown nestql error");
    }
}
