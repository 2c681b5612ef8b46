use super::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprInList {
    pub expr: Operand,
    pub list: Vec<ParameterIndex>,

    /// When `true`, this is a "not in" check.
    pub negate: bool,
}

impl Expr {
    pub fn in_list(expr: impl Into<Operand>, list: Vec<ParameterIndex>) -> Self {
        ExprInList {
            expr: expr.into(),
            list,
            negate: false,
        }
        .into()
    }

    pub fn not_in_list(expr: impl Into<Operand>, list: Vec<ParameterIndex>) -> Self {
        ExprInList {
            expr: expr.into(),
            list,
            negate: true,
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Self::InList(value)
    }
}
