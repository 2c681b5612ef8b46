use super::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A boolean condition in a WHERE clause or join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// AND a set of conditions
    And(ExprAnd),

    /// Compare two operands
    BinaryOp(ExprBinaryOp),

    /// Operand is (or is not) one of a list of parameters
    InList(ExprInList),

    /// Whether an operand is (or is not) null
    IsNull(ExprIsNull),

    /// Negate a condition
    Not(ExprNot),

    /// OR a set of conditions
    Or(ExprOr),

    /// Substring match
    Pattern(ExprPattern),
}

impl Expr {
    /// Every parameter referenced by this condition, in render order.
    pub fn params(&self) -> Vec<ParameterIndex> {
        let mut out = vec![];
        self.collect_params(&mut out);
        out
    }

    pub(crate) fn collect_params(&self, out: &mut Vec<ParameterIndex>) {
        match self {
            Expr::And(expr) => expr.iter().for_each(|e| e.collect_params(out)),
            Expr::Or(expr) => expr.iter().for_each(|e| e.collect_params(out)),
            Expr::Not(expr) => expr.expr.collect_params(out),
            Expr::BinaryOp(expr) => {
                expr.lhs.collect_params(out);
                expr.rhs.collect_params(out);
            }
            Expr::InList(expr) => {
                expr.expr.collect_params(out);
                out.extend(expr.list.iter().copied());
            }
            Expr::IsNull(expr) => expr.expr.collect_params(out),
            Expr::Pattern(expr) => {
                expr.expr.collect_params(out);
                out.push(expr.value);
            }
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Expr::And(_) | Expr::Or(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(expr) => fmt_joined(f, expr, " AND "),
            Expr::Or(expr) => fmt_joined(f, expr, " OR "),
            Expr::Not(expr) => write!(f, "NOT ({})", expr.expr),
            Expr::BinaryOp(expr) => write!(f, "{} {} {}", expr.lhs, expr.op, expr.rhs),
            Expr::InList(expr) => {
                write!(f, "{} ", expr.expr)?;
                if expr.negate {
                    f.write_str("NOT ")?;
                }
                f.write_str("IN (")?;
                for (i, param) in expr.list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                f.write_str(")")
            }
            Expr::IsNull(expr) if expr.negate => write!(f, "{} IS NOT NULL", expr.expr),
            Expr::IsNull(expr) => write!(f, "{} IS NULL", expr.expr),
            Expr::Pattern(expr) => {
                write!(f, "{} ", expr.expr)?;
                if expr.negate {
                    f.write_str("NOT ")?;
                }
                write!(f, "{} {}", expr.pattern, expr.value)
            }
        }
    }
}

fn fmt_joined(f: &mut fmt::Formatter<'_>, operands: &[Expr], sep: &str) -> fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        if operand.is_compound() {
            write!(f, "({operand})")?;
        } else {
            write!(f, "{operand}")?;
        }
    }
    Ok(())
}
