use super::{IndexGenerators, SubQuery};
use crate::mapping::AliasMapping;
use crate::query::FieldNode;
use crate::stmt::{
    ColumnIndex, Join, ParameterIndex, Params, SelectJson, Selection, TableIndex, Value,
};
use crate::Result;

/// The output of converting one level of field nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedFields {
    pub select: Vec<Selection>,
    pub joins: Vec<Join>,

    /// Values bound while converting, starting at the parameter counter's
    /// position when conversion began.
    pub parameters: Vec<Value>,

    pub sub_queries: Vec<SubQuery>,
    pub alias_mapping: Vec<AliasMapping>,
}

/// Converts `nodes` read from the table at `table`, allocating every index
/// from `gen`.
pub fn convert_field_nodes(
    nodes: &[FieldNode],
    table: TableIndex,
    gen: &mut IndexGenerators,
) -> Result<ConvertedFields> {
    let mut converter = Converter::new(gen);
    let alias_mapping = converter.convert_nodes(nodes, table)?;

    let mut fields = converter.finish();
    fields.alias_mapping = alias_mapping;
    Ok(fields)
}

/// Accumulates the clauses of one compiled level.
///
/// Joined relations write into the same accumulator as their parent, so
/// deferred sub-queries found at any join depth are numbered in one list.
pub(super) struct Converter<'a> {
    pub(super) gen: &'a mut IndexGenerators,
    param_base: usize,
    pub(super) select: Vec<Selection>,
    pub(super) joins: Vec<Join>,
    pub(super) parameters: Vec<Value>,
    pub(super) sub_queries: Vec<SubQuery>,
}

impl<'a> Converter<'a> {
    pub(super) fn new(gen: &'a mut IndexGenerators) -> Converter<'a> {
        Converter {
            param_base: gen.parameter.peek(),
            gen,
            select: vec![],
            joins: vec![],
            parameters: vec![],
            sub_queries: vec![],
        }
    }

    pub(super) fn finish(self) -> ConvertedFields {
        ConvertedFields {
            select: self.select,
            joins: self.joins,
            parameters: self.parameters,
            sub_queries: self.sub_queries,
            alias_mapping: vec![],
        }
    }

    pub(super) fn convert_nodes(
        &mut self,
        nodes: &[FieldNode],
        table: TableIndex,
    ) -> Result<Vec<AliasMapping>> {
        let mut mapping = Vec::with_capacity(nodes.len());

        for node in nodes {
            let entry = match node {
                FieldNode::Primitive { field, alias } => {
                    let column = self.select_column(table, field);
                    AliasMapping::root(alias, column)
                }
                FieldNode::JsonPath { field, path, alias } => {
                    let path = path
                        .iter()
                        .map(|segment| self.param(json_segment(segment)))
                        .collect();
                    let index = self.gen.column();
                    self.select.push(Selection::Json(SelectJson {
                        table,
                        column: field.clone(),
                        path,
                        index,
                    }));
                    AliasMapping::root(alias, index)
                }
                FieldNode::NestedOne {
                    alias,
                    fields,
                    nesting,
                } => self.nested_one(alias, fields, nesting, table)?,
                FieldNode::NestedMany {
                    alias,
                    fields,
                    nesting,
                    modifiers,
                } => self.nested_many(alias, fields, nesting, modifiers, table)?,
                FieldNode::NestedUnionOne { alias, nesting } => {
                    self.nested_union_one(alias, nesting, table)?
                }
                FieldNode::NestedUnionMany {
                    alias,
                    nesting,
                    modifiers,
                } => self.nested_union_many(alias, nesting, modifiers, table)?,
            };
            mapping.push(entry);
        }

        Ok(mapping)
    }

    /// Binds `value` and returns its placeholder.
    pub(super) fn param(&mut self, value: impl Into<Value>) -> ParameterIndex {
        let index = self.gen.parameter();
        debug_assert_eq!(index.0, self.param_base + self.parameters.len());
        self.parameters.push(value.into());
        index
    }

    /// Selects `table.column` under a new column index.
    pub(super) fn select_column(&mut self, table: TableIndex, column: &str) -> ColumnIndex {
        let index = self.gen.column();
        self.select.push(Selection::column(table, column, index));
        index
    }

    /// Reuses an existing selection of `table.column`, or selects it.
    pub(super) fn column_for(&mut self, table: TableIndex, column: &str) -> ColumnIndex {
        match self
            .select
            .iter()
            .find_map(|select| select.selects(table, column))
        {
            Some(index) => index,
            None => self.select_column(table, column),
        }
    }
}

impl Params for Converter<'_> {
    fn push(&mut self, value: Value) -> ParameterIndex {
        self.param(value)
    }
}

/// Numeric path segments address array elements.
fn json_segment(segment: &str) -> Value {
    match segment.parse::<u64>() {
        Ok(position) => Value::from(position),
        Err(_) => Value::from(segment),
    }
}
