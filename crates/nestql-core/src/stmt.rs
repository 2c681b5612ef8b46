mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_pattern;
pub use expr_pattern::{ExprPattern, Pattern};

mod index;
pub use index::{ColumnIndex, ParameterIndex, TableIndex};

mod join;
pub use join::Join;

mod op_binary;
pub use op_binary::BinaryOp;

mod operand;
pub use operand::{ColumnRef, JsonRef, Operand};

mod order_by;
pub use order_by::OrderBy;

mod params;
pub use params::Params;

mod selection;
pub use selection::{SelectColumn, SelectJson, Selection};

mod sql_query;
pub use sql_query::{Clauses, SqlQuery, TableRef};

pub use serde_json::Value;
