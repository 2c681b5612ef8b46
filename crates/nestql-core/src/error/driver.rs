use super::Error;

use std::error::Error as StdError;
use std::fmt;
use std::iter;

/// A [`Driver`](crate::Driver) failed to run a compiled query.
///
/// Displays the driver's own message, then each error in its source chain.
#[derive(Debug)]
pub(super) struct DriverError {
    source: Box<dyn StdError + Send + Sync>,
}

impl DriverError {
    fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        let first: &(dyn StdError + 'static) = &*self.source;
        iter::successors(Some(first), |&err| err.source())
    }
}

impl StdError for DriverError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.chain().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Wraps an error raised while a driver ran a query.
    pub fn driver(err: impl StdError + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            source: Box::new(err),
        }))
    }

    pub fn is_driver(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Driver(_))
    }
}
