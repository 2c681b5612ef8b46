use super::{Expr, Operand, ParameterIndex};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Matches a string operand against a bound substring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprPattern {
    pub expr: Operand,
    pub pattern: Pattern,
    pub value: ParameterIndex,
    pub negate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Contains,
    StartsWith,
    EndsWith,
}

impl Expr {
    pub fn pattern(
        expr: impl Into<Operand>,
        pattern: Pattern,
        value: ParameterIndex,
        negate: bool,
    ) -> Self {
        ExprPattern {
            expr: expr.into(),
            pattern,
            value,
            negate,
        }
        .into()
    }
}

impl From<ExprPattern> for Expr {
    fn from(value: ExprPattern) -> Self {
        Self::Pattern(value)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pattern::Contains => "CONTAINS",
            Pattern::StartsWith => "STARTS WITH",
            Pattern::EndsWith => "ENDS WITH",
        })
    }
}
