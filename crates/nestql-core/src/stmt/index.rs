use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one table slot in a compiled query. Rendered as `t{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableIndex(pub usize);

/// Identifies one selected column in a compiled query. Rows returned for the
/// query key each value by [`ColumnIndex::alias`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnIndex(pub usize);

/// Position of a bound value in [`SqlQuery::parameters`](super::SqlQuery).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterIndex(pub usize);

impl TableIndex {
    pub fn alias(self) -> String {
        format!("t{}", self.0)
    }
}

impl ColumnIndex {
    pub fn alias(self) -> String {
        format!("c{}", self.0)
    }
}

impl fmt::Display for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for ColumnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl fmt::Display for ParameterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}
