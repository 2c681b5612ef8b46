use super::is_operator;
use crate::stmt::{BinaryOp, Expr, Operand, Params, Pattern, TableIndex, Value};
use crate::{Error, Result};

use serde_json::Map;

/// Converts a filter on the columns of `table` into a WHERE condition,
/// binding every operand through `params`.
///
/// Returns `None` for an empty filter.
pub(crate) fn to_expr<P: Params>(
    filter: &Value,
    table: TableIndex,
    params: &mut P,
) -> Result<Option<Expr>> {
    let Value::Object(object) = filter else {
        return Err(Error::invalid_query("a filter must be an object"));
    };
    object_to_expr(object, table, params)
}

fn object_to_expr<P: Params>(
    object: &Map<String, Value>,
    table: TableIndex,
    params: &mut P,
) -> Result<Option<Expr>> {
    let mut operands = vec![];

    for (key, value) in object {
        match key.as_str() {
            "_and" | "_or" => {
                let Value::Array(items) = value else {
                    return Err(Error::invalid_query(format!(
                        "`{key}` expects an array of filters"
                    )));
                };

                let mut parts = vec![];
                for item in items {
                    let Value::Object(item) = item else {
                        return Err(Error::invalid_query(format!(
                            "`{key}` entries must be objects"
                        )));
                    };
                    parts.extend(object_to_expr(item, table, params)?);
                }

                let combined = if key == "_and" {
                    Expr::and_from_vec(parts)
                } else {
                    Expr::or_from_vec(parts)
                };
                operands.extend(combined);
            }
            key if is_operator(key) => {
                return Err(Error::invalid_query(format!(
                    "`{key}` must be applied to a field"
                )));
            }
            field => {
                let Value::Object(ops) = value else {
                    return Err(Error::invalid_query(format!(
                        "`{field}` expects an operator object such as {{ \"_eq\": .. }}"
                    )));
                };

                if field.contains(':') || ops.keys().any(|op| !is_operator(op)) {
                    return Err(Error::invalid_query(format!(
                        "relational filter on `{field}` cannot be converted into a condition"
                    )));
                }

                for (op, operand) in ops {
                    operands.push(operator_expr(field, op, operand, table, params)?);
                }
            }
        }
    }

    Ok(Expr::and_from_vec(operands))
}

fn operator_expr<P: Params>(
    field: &str,
    op: &str,
    operand: &Value,
    table: TableIndex,
    params: &mut P,
) -> Result<Expr> {
    let column = Operand::column(table, field);

    Ok(match op {
        "_eq" if operand.is_null() => Expr::is_null(column),
        "_neq" if operand.is_null() => Expr::is_not_null(column),
        "_eq" => compare(column, BinaryOp::Eq, operand, params),
        "_neq" => compare(column, BinaryOp::Ne, operand, params),
        "_lt" => compare(column, BinaryOp::Lt, operand, params),
        "_lte" => compare(column, BinaryOp::Le, operand, params),
        "_gt" => compare(column, BinaryOp::Gt, operand, params),
        "_gte" => compare(column, BinaryOp::Ge, operand, params),
        "_in" | "_nin" => {
            let Value::Array(items) = operand else {
                return Err(Error::invalid_query(format!(
                    "`{field}.{op}` expects an array"
                )));
            };
            let list = items.iter().map(|item| params.push(item.clone())).collect();
            if op == "_in" {
                Expr::in_list(column, list)
            } else {
                Expr::not_in_list(column, list)
            }
        }
        "_null" | "_nnull" => {
            let Value::Bool(flag) = operand else {
                return Err(Error::invalid_query(format!(
                    "`{field}.{op}` expects a boolean"
                )));
            };
            if *flag == (op == "_null") {
                Expr::is_null(column)
            } else {
                Expr::is_not_null(column)
            }
        }
        "_contains" | "_ncontains" | "_starts_with" | "_nstarts_with" | "_ends_with"
        | "_nends_with" => {
            if !operand.is_string() {
                return Err(Error::invalid_query(format!(
                    "`{field}.{op}` expects a string"
                )));
            }
            let negate = op.starts_with("_n");
            let pattern = match op.trim_start_matches("_n").trim_start_matches('_') {
                "contains" => Pattern::Contains,
                "starts_with" => Pattern::StartsWith,
                _ => Pattern::EndsWith,
            };
            let value = params.push(operand.clone());
            Expr::pattern(column, pattern, value, negate)
        }
        _ => {
            return Err(Error::invalid_query(format!(
                "unknown filter operator `{op}` on `{field}`"
            )));
        }
    })
}

fn compare<P: Params>(column: Operand, op: BinaryOp, operand: &Value, params: &mut P) -> Expr {
    let param = params.push(operand.clone());
    Expr::binary_op(column, op, param)
}
