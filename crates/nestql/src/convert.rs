//! Compiles an [`AbstractQuery`] into dialect-neutral SQL plus the alias
//! mapping needed to turn its rows back into nested items.
//!
//! One-to-many and one-to-any fields are not joined. They compile to
//! [`SubQuery`] descriptors that build their query once the parent row's key
//! values are known.

mod fields;
pub use fields::{convert_field_nodes, ConvertedFields};

mod index;
pub use index::{IndexGenerator, IndexGenerators};

mod nested_many;
pub use nested_many::NestedManyQuery;

mod nested_one;

mod nested_union_many;
pub use nested_union_many::{NestedUnionManyQuery, UnionManyTarget, UnionQuery};

mod nested_union_one;

mod reference;
pub use reference::{A2oReference, ForeignKeyPart};

use crate::mapping::AliasMapping;
use crate::query::Modifiers;
use crate::stmt::{Clauses, Operand, OrderBy, SqlQuery, TableRef};
use crate::{filter, AbstractQuery, Result};
use fields::Converter;
use nestql_core::query::FieldNode;

use serde::{Deserialize, Serialize};

/// A compiled query: the statement for one level plus everything needed to
/// fetch and reassemble the levels below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterResult {
    pub root_query: SqlQuery,
    pub sub_queries: Vec<SubQuery>,
    pub alias_mapping: Vec<AliasMapping>,
}

/// A deferred query, run once per parent row after the parent level returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SubQuery {
    Many(NestedManyQuery),
    UnionMany(NestedUnionManyQuery),
}

impl SubQuery {
    pub fn alias(&self) -> &str {
        match self {
            SubQuery::Many(many) => &many.alias,
            SubQuery::UnionMany(union) => &union.alias,
        }
    }

    /// Sort and pagination applied to the rows this sub-query returns.
    pub fn modifiers(&self) -> &Modifiers {
        match self {
            SubQuery::Many(many) => &many.modifiers,
            SubQuery::UnionMany(union) => &union.modifiers,
        }
    }
}

/// Compiles a root query, including its filter, sort, and pagination.
pub fn convert_query(query: &AbstractQuery) -> Result<ConverterResult> {
    let result = compile(&query.collection, &query.fields, &query.modifiers, true)?;

    tracing::debug!(
        collection = %query.collection,
        selects = result.root_query.clauses.select.len(),
        joins = result.root_query.clauses.joins.len(),
        params = result.root_query.parameters.len(),
        sub_queries = result.sub_queries.len(),
        "nestql.compile"
    );

    Ok(result)
}

/// Compiles one level in a fresh index namespace. Deferred templates keep
/// their ORDER BY but skip LIMIT and OFFSET, which are applied per parent
/// after their rows come back.
fn compile(
    collection: &str,
    fields: &[FieldNode],
    modifiers: &Modifiers,
    paginate: bool,
) -> Result<ConverterResult> {
    let mut gen = IndexGenerators::new();
    let table = gen.table();

    let mut converter = Converter::new(&mut gen);
    let alias_mapping = converter.convert_nodes(fields, table)?;

    let filter = match &modifiers.filter {
        Some(filter) => filter::to_expr(filter, table, &mut converter)?,
        None => None,
    };

    let order_by = modifiers
        .sort
        .iter()
        .map(|sort| OrderBy {
            expr: Operand::column(table, sort.field.clone()),
            direction: sort.direction,
        })
        .collect();

    let mut limit = None;
    let mut offset = None;

    if paginate {
        if let Some(count) = modifiers.limit.and_then(|limit| limit.count()) {
            limit = Some(converter.param(count));
        }

        if let Some(skip) = modifiers.effective_offset().filter(|skip| *skip > 0) {
            offset = Some(converter.param(skip));
        }
    }

    let fields = converter.finish();

    let root_query = SqlQuery {
        clauses: Clauses {
            select: fields.select,
            from: TableRef {
                collection: collection.to_string(),
                table,
            },
            joins: fields.joins,
            filter,
            order_by,
            limit,
            offset,
        },
        parameters: fields.parameters,
    };

    debug_assert!(root_query
        .placeholders()
        .iter()
        .all(|param| param.0 < root_query.parameters.len()));

    Ok(ConverterResult {
        root_query,
        sub_queries: fields.sub_queries,
        alias_mapping,
    })
}

fn check_key_pairs(alias: &str, local: &[String], foreign: &[String]) -> Result<()> {
    if local.is_empty() || local.len() != foreign.len() {
        return Err(crate::Error::schema_mismatch(format!(
            "`{alias}` pairs {} local fields with {} foreign fields",
            local.len(),
            foreign.len()
        )));
    }
    Ok(())
}
