use super::{Expr, Operand};

use serde::{Deserialize, Serialize};

/// Tests whether an operand is null.
///
/// This is different from a binary expression because of how databases
/// treat null comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprIsNull {
    /// When `true`, this is an "is not null" check.
    pub negate: bool,

    /// The operand to check for null.
    pub expr: Operand,
}

impl Expr {
    pub fn is_null(expr: impl Into<Operand>) -> Self {
        ExprIsNull {
            negate: false,
            expr: expr.into(),
        }
        .into()
    }

    pub fn is_not_null(expr: impl Into<Operand>) -> Self {
        ExprIsNull {
            negate: true,
            expr: expr.into(),
        }
        .into()
    }
}

impl From<ExprIsNull> for Expr {
    fn from(value: ExprIsNull) -> Self {
        Self::IsNull(value)
    }
}
