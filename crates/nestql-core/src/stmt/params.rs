use super::{ParameterIndex, SqlQuery, Value};

/// A sink for bound values that hands back the placeholder for each one.
pub trait Params {
    fn push(&mut self, value: Value) -> ParameterIndex;
}

impl Params for Vec<Value> {
    fn push(&mut self, value: Value) -> ParameterIndex {
        let index = ParameterIndex(self.len());
        Vec::push(self, value);
        index
    }
}

impl Params for SqlQuery {
    fn push(&mut self, value: Value) -> ParameterIndex {
        self.push_param(value)
    }
}
