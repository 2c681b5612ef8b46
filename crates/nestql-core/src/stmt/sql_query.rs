use super::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dialect-neutral SELECT statement plus its bound values.
///
/// Placeholder `$n` anywhere in the clauses refers to `parameters[n]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuery {
    pub clauses: Clauses,
    pub parameters: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clauses {
    pub select: Vec<Selection>,
    pub from: TableRef,
    pub joins: Vec<Join>,
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<ParameterIndex>,
    pub offset: Option<ParameterIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub collection: String,
    pub table: TableIndex,
}

impl SqlQuery {
    pub fn new(collection: impl Into<String>, table: TableIndex) -> SqlQuery {
        SqlQuery {
            clauses: Clauses {
                select: vec![],
                from: TableRef {
                    collection: collection.into(),
                    table,
                },
                joins: vec![],
                filter: None,
                order_by: vec![],
                limit: None,
                offset: None,
            },
            parameters: vec![],
        }
    }

    /// Appends a bound value and returns the placeholder that refers to it.
    pub fn push_param(&mut self, value: impl Into<Value>) -> ParameterIndex {
        let index = ParameterIndex(self.parameters.len());
        self.parameters.push(value.into());
        index
    }

    /// ANDs `expr` onto the WHERE clause.
    pub fn and_filter(&mut self, expr: Expr) {
        self.clauses.filter = Some(match self.clauses.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr,
        });
    }

    /// Every placeholder referenced by the statement, in render order.
    pub fn placeholders(&self) -> Vec<ParameterIndex> {
        let mut out = vec![];

        for select in &self.clauses.select {
            if let Selection::Json(select) = select {
                out.extend(select.path.iter().copied());
            }
        }

        for join in &self.clauses.joins {
            join.on.collect_params(&mut out);
        }

        if let Some(filter) = &self.clauses.filter {
            filter.collect_params(&mut out);
        }

        for order_by in &self.clauses.order_by {
            order_by.expr.collect_params(&mut out);
        }

        out.extend(self.clauses.limit);
        out.extend(self.clauses.offset);
        out
    }

    /// The value bound to `param`.
    pub fn param(&self, param: ParameterIndex) -> Option<&Value> {
        self.parameters.get(param.0)
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses = &self.clauses;

        f.write_str("SELECT ")?;
        for (i, select) in clauses.select.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{select}")?;
        }

        write!(f, " FROM {} AS {}", clauses.from.collection, clauses.from.table)?;

        for join in &clauses.joins {
            write!(
                f,
                " LEFT JOIN {} AS {} ON {}",
                join.collection, join.table, join.on
            )?;
        }

        if let Some(filter) = &clauses.filter {
            write!(f, " WHERE {filter}")?;
        }

        for (i, order_by) in clauses.order_by.iter().enumerate() {
            f.write_str(if i == 0 { " ORDER BY " } else { ", " })?;
            write!(f, "{}", order_by.expr)?;
            if order_by.direction.is_desc() {
                f.write_str(" DESC")?;
            }
        }

        if let Some(limit) = clauses.limit {
            write!(f, " LIMIT {limit}")?;
        }

        if let Some(offset) = clauses.offset {
            write!(f, " OFFSET {offset}")?;
        }

        Ok(())
    }
}
