pub mod driver;
pub use driver::{Driver, Row};

mod error;
pub use error::{Error, IntoError};

pub mod query;
pub use query::AbstractQuery;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses nestql's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
