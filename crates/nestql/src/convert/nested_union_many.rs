use super::nested_many::read_columns;
use super::reference::{A2oReference, FOREIGN_COLLECTION, FOREIGN_KEY};
use super::{compile, fields::Converter, ConverterResult, SubQuery};
use crate::mapping::AliasMapping;
use crate::query::{Modifiers, UnionManyNesting};
use crate::stmt::{ColumnIndex, Expr, Operand, TableIndex, Value};
use crate::{Error, Result, Row};

use serde::{Deserialize, Serialize};

/// The deferred queries of a one-to-any field, one per target collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedUnionManyQuery {
    pub alias: String,

    /// Where the parent's identifier values sit in the parent row.
    pub identifier_columns: Vec<ColumnIndex>,

    pub targets: Vec<UnionManyTarget>,

    /// Applied to each target's returned items.
    pub modifiers: Modifiers,
}

/// One target collection of a [`NestedUnionManyQuery`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionManyTarget {
    pub collection: String,

    /// Discriminator column on `collection`.
    pub field: String,

    pub identifier_fields: Vec<String>,

    /// Collection name matched against the discriminators.
    pub referenced_collection: String,

    pub template: ConverterResult,
}

/// A target's query for one parent row.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionQuery {
    pub collection: String,
    pub reference: A2oReference,
    pub result: ConverterResult,
}

impl NestedUnionManyQuery {
    pub fn identifier_values<F>(&self, row: &Row, column_alias: F) -> Vec<Value>
    where
        F: Fn(ColumnIndex) -> String,
    {
        read_columns(row, &self.identifier_columns, column_alias)
    }

    /// Builds one query per target collection for the parent `row`, in
    /// target declaration order.
    pub fn queries<F>(&self, row: &Row, column_alias: F) -> Result<Vec<UnionQuery>>
    where
        F: Fn(ColumnIndex) -> String,
    {
        let values = self.identifier_values(row, column_alias);
        self.targets
            .iter()
            .map(|target| target.query(&values))
            .collect()
    }
}

impl UnionManyTarget {
    /// Builds this target's query for a parent with identifier `values`.
    pub fn query(&self, values: &[Value]) -> Result<UnionQuery> {
        if values.len() != self.identifier_fields.len() {
            return Err(Error::schema_mismatch(format!(
                "`{}` expects {} identifier values, got {}",
                self.collection,
                self.identifier_fields.len(),
                values.len()
            )));
        }

        let reference = A2oReference::new(
            &self.referenced_collection,
            &self.identifier_fields,
            values,
        );

        let mut result = self.template.clone();
        let query = &mut result.root_query;
        let table = query.clauses.from.table;

        let collection_key = query.push_param(FOREIGN_COLLECTION);
        let collection_name = query.push_param(reference.foreign_collection.clone());
        let key = query.push_param(FOREIGN_KEY);
        let key_value = query.push_param(serde_json::to_value(&reference.foreign_key)?);

        query.and_filter(Expr::and(
            Expr::eq(
                Operand::json(table, self.field.clone(), vec![collection_key]),
                collection_name,
            ),
            Expr::eq(Operand::json(table, self.field.clone(), vec![key]), key_value),
        ));

        Ok(UnionQuery {
            collection: self.collection.clone(),
            reference,
            result,
        })
    }
}

impl Converter<'_> {
    pub(super) fn nested_union_many(
        &mut self,
        alias: &str,
        nesting: &UnionManyNesting,
        modifiers: &Modifiers,
        table: TableIndex,
    ) -> Result<AliasMapping> {
        if nesting.identifier_fields.is_empty() {
            return Err(Error::schema_mismatch(format!(
                "`{alias}` has no identifier fields"
            )));
        }

        let identifier_columns = nesting
            .identifier_fields
            .iter()
            .map(|field| self.column_for(table, field))
            .collect();

        let targets = nesting
            .collections
            .iter()
            .map(|target| {
                if target.identifier_fields.len() != nesting.identifier_fields.len() {
                    return Err(Error::schema_mismatch(format!(
                        "`{alias}` target `{}` has {} identifier fields, expected {}",
                        target.collection,
                        target.identifier_fields.len(),
                        nesting.identifier_fields.len()
                    )));
                }

                Ok(UnionManyTarget {
                    collection: target.collection.clone(),
                    field: target.field.clone(),
                    identifier_fields: target.identifier_fields.clone(),
                    referenced_collection: target
                        .referenced_collection
                        .clone()
                        .unwrap_or_else(|| target.collection.clone()),
                    template: compile(&target.collection, &target.fields, modifiers, false)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let index = self.sub_queries.len();
        self.sub_queries.push(SubQuery::UnionMany(NestedUnionManyQuery {
            alias: alias.to_string(),
            identifier_columns,
            targets,
            modifiers: modifiers.clone(),
        }));

        Ok(AliasMapping::Sub {
            alias: alias.to_string(),
            index,
        })
    }
}
