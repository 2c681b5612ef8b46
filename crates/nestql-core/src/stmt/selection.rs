use super::{ColumnIndex, ParameterIndex, TableIndex};

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a SELECT list. Every selection carries the column index its
/// value is returned under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    Column(SelectColumn),
    Json(SelectJson),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectColumn {
    pub table: TableIndex,
    pub column: String,
    pub index: ColumnIndex,
}

/// Selects a value nested inside a JSON column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectJson {
    pub table: TableIndex,
    pub column: String,
    pub path: Vec<ParameterIndex>,
    pub index: ColumnIndex,
}

impl Selection {
    pub fn column(table: TableIndex, column: impl Into<String>, index: ColumnIndex) -> Selection {
        Selection::Column(SelectColumn {
            table,
            column: column.into(),
            index,
        })
    }

    pub fn index(&self) -> ColumnIndex {
        match self {
            Selection::Column(select) => select.index,
            Selection::Json(select) => select.index,
        }
    }

    /// Returns the column index if this selects `table.column` directly.
    pub fn selects(&self, table: TableIndex, column: &str) -> Option<ColumnIndex> {
        match self {
            Selection::Column(select) if select.table == table && select.column == column => {
                Some(select.index)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Column(select) => {
                write!(f, "{}.{} AS {}", select.table, select.column, select.index)
            }
            Selection::Json(select) => {
                write!(f, "json({}.{}", select.table, select.column)?;
                for segment in &select.path {
                    write!(f, ", {segment}")?;
                }
                write!(f, ") AS {}", select.index)
            }
        }
    }
}
