use super::{Expr, TableIndex};

use serde::{Deserialize, Serialize};

/// A LEFT JOIN of `collection` under the alias of `table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub collection: String,
    pub table: TableIndex,
    pub on: Expr,
}
