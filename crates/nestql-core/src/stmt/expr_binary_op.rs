use super::{BinaryOp, Expr, Operand};

use serde::{Deserialize, Serialize};

/// A comparison between two operands.
///
/// # Examples
///
/// ```text
/// eq(t0.author, t1.id)   // join condition
/// gt(t0.views, $3)       // filter against a bound value
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprBinaryOp {
    /// The left-hand side operand.
    pub lhs: Operand,

    /// The operator to apply.
    pub op: BinaryOp,

    /// The right-hand side operand.
    pub rhs: Operand,
}

impl Expr {
    pub fn binary_op(lhs: impl Into<Operand>, op: BinaryOp, rhs: impl Into<Operand>) -> Self {
        ExprBinaryOp {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
        .into()
    }

    pub fn eq(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Expr::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    /// Returns true if the expression is a binary expression with the equality operator
    pub fn is_eq(&self) -> bool {
        matches!(
            self,
            Self::BinaryOp(ExprBinaryOp {
                op: BinaryOp::Eq,
                ..
            })
        )
    }
}

impl From<ExprBinaryOp> for Expr {
    fn from(value: ExprBinaryOp) -> Self {
        Self::BinaryOp(value)
    }
}
