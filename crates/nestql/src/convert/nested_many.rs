use super::{check_key_pairs, compile, fields::Converter, ConverterResult, SubQuery};
use crate::mapping::AliasMapping;
use crate::query::{FieldNode, Modifiers, Nesting};
use crate::stmt::{ColumnIndex, Expr, Operand, TableIndex, Value};
use crate::{Error, Result, Row};

use serde::{Deserialize, Serialize};

/// The deferred query of a one-to-many field.
///
/// `template` is the nested level compiled once, without a key condition.
/// [`query`](Self::query) adds the key condition for one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedManyQuery {
    pub alias: String,
    pub collection: String,

    /// Where the parent's key values sit in the parent row.
    pub local_columns: Vec<ColumnIndex>,
    pub local_fields: Vec<String>,
    pub foreign_fields: Vec<String>,

    pub template: ConverterResult,

    /// Applied to the returned items, not to the query.
    pub modifiers: Modifiers,
}

impl NestedManyQuery {
    /// Builds the query returning the children of the parent whose key is
    /// `pk_values`, given in `local_fields` order.
    ///
    /// Calling this twice with the same values yields identical queries.
    pub fn query(&self, pk_values: &[Value]) -> Result<ConverterResult> {
        if pk_values.len() != self.foreign_fields.len() {
            return Err(Error::schema_mismatch(format!(
                "`{}` expects {} key values, got {}",
                self.alias,
                self.foreign_fields.len(),
                pk_values.len()
            )));
        }

        let mut result = self.template.clone();
        let query = &mut result.root_query;
        let table = query.clauses.from.table;

        let conditions = self
            .foreign_fields
            .iter()
            .zip(pk_values)
            .map(|(field, value)| {
                let param = query.push_param(value.clone());
                Expr::eq(Operand::column(table, field.clone()), param)
            })
            .collect();

        if let Some(condition) = Expr::and_from_vec(conditions) {
            query.and_filter(condition);
        }

        Ok(result)
    }

    /// Reads the parent's key values out of a parent row. Missing columns
    /// read as null.
    pub fn identifier_values<F>(&self, row: &Row, column_alias: F) -> Vec<Value>
    where
        F: Fn(ColumnIndex) -> String,
    {
        read_columns(row, &self.local_columns, column_alias)
    }
}

pub(super) fn read_columns<F>(row: &Row, columns: &[ColumnIndex], column_alias: F) -> Vec<Value>
where
    F: Fn(ColumnIndex) -> String,
{
    columns
        .iter()
        .map(|column| row.get(&column_alias(*column)).cloned().unwrap_or(Value::Null))
        .collect()
}

impl Converter<'_> {
    /// Selects the parent key and compiles the nested level as a deferred
    /// template in its own index namespace.
    pub(super) fn nested_many(
        &mut self,
        alias: &str,
        fields: &[FieldNode],
        nesting: &Nesting,
        modifiers: &Modifiers,
        table: TableIndex,
    ) -> Result<AliasMapping> {
        check_key_pairs(alias, &nesting.local_fields, &nesting.foreign_fields)?;

        let local_columns = nesting
            .local_fields
            .iter()
            .map(|field| self.column_for(table, field))
            .collect();

        let template = compile(&nesting.foreign_collection, fields, modifiers, false)?;

        let index = self.sub_queries.len();
        self.sub_queries.push(SubQuery::Many(NestedManyQuery {
            alias: alias.to_string(),
            collection: nesting.foreign_collection.clone(),
            local_columns,
            local_fields: nesting.local_fields.clone(),
            foreign_fields: nesting.foreign_fields.clone(),
            template,
            modifiers: modifiers.clone(),
        }));

        Ok(AliasMapping::Sub {
            alias: alias.to_string(),
            index,
        })
    }
}
