use crate::{async_trait, stmt::SqlQuery};

use std::fmt::Debug;

/// One result row, keyed by column alias (`c0`, `c1`, ...).
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Renders and runs compiled queries against a database.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute a query, returning its rows in order.
    async fn query(&self, query: &SqlQuery) -> crate::Result<Vec<Row>>;
}
