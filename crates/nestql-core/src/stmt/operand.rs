use super::{ParameterIndex, TableIndex};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A leaf of a condition: a column, a path inside a JSON column, or a bound
/// parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Column(ColumnRef),
    Json(JsonRef),
    Param(ParameterIndex),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: TableIndex,
    pub column: String,
}

/// A value inside a JSON column. Each path segment is itself a parameter so
/// renderers never splice user text into the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRef {
    pub table: TableIndex,
    pub column: String,
    pub path: Vec<ParameterIndex>,
}

impl Operand {
    pub fn column(table: TableIndex, column: impl Into<String>) -> Operand {
        ColumnRef {
            table,
            column: column.into(),
        }
        .into()
    }

    pub fn json(table: TableIndex, column: impl Into<String>, path: Vec<ParameterIndex>) -> Operand {
        JsonRef {
            table,
            column: column.into(),
            path,
        }
        .into()
    }

    pub(crate) fn collect_params(&self, out: &mut Vec<ParameterIndex>) {
        match self {
            Operand::Column(_) => {}
            Operand::Json(json) => out.extend(json.path.iter().copied()),
            Operand::Param(param) => out.push(*param),
        }
    }
}

impl From<ColumnRef> for Operand {
    fn from(value: ColumnRef) -> Self {
        Operand::Column(value)
    }
}

impl From<JsonRef> for Operand {
    fn from(value: JsonRef) -> Self {
        Operand::Json(value)
    }
}

impl From<ParameterIndex> for Operand {
    fn from(value: ParameterIndex) -> Self {
        Operand::Param(value)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

impl fmt::Display for JsonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "json({}.{}", self.table, self.column)?;
        for segment in &self.path {
            write!(f, ", {segment}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(column) => column.fmt(f),
            Operand::Json(json) => json.fmt(f),
            Operand::Param(param) => param.fmt(f),
        }
    }
}
