use crate::convert::{convert_query, ConverterResult, SubQuery};
use crate::result::{apply_nested_modifiers, map_result};
use crate::stmt::{ColumnIndex, Value};
use crate::{plan, AbstractQuery, Config, Driver, Permissions, Request, Result, Row, Schema};

use async_recursion::async_recursion;
use serde_json::Map;
use std::sync::Arc;

/// Runs compiled queries, and the deferred queries below them, against a
/// [`Driver`] and reassembles the nested items.
#[derive(Debug, Clone)]
pub struct Engine {
    driver: Arc<dyn Driver>,
    config: Config,
}

impl Engine {
    pub fn new(driver: impl Driver) -> Engine {
        Engine {
            driver: Arc::new(driver),
            config: Config::default(),
        }
    }

    pub fn config(mut self, config: Config) -> Engine {
        self.config = config;
        self
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.driver
    }

    /// Compiles and runs `query`, returning one nested item per root row.
    pub async fn query(&self, query: &AbstractQuery) -> Result<Vec<Value>> {
        let compiled = convert_query(query)?;
        self.exec(&compiled).await
    }

    /// Plans `request` for a caller holding `permissions`, then runs it.
    pub async fn request(
        &self,
        schema: &Schema,
        permissions: &Permissions,
        request: &Request,
    ) -> Result<Vec<Value>> {
        let query = plan(schema, permissions, &self.config, request)?;
        self.query(&query).await
    }

    /// Runs one level. Each row's deferred queries run after the level
    /// returns, in declaration order, and are spliced in by `map_result`.
    #[async_recursion]
    async fn exec(&self, compiled: &ConverterResult) -> Result<Vec<Value>> {
        let rows = self.driver.query(&compiled.root_query).await?;

        tracing::debug!(
            collection = %compiled.root_query.clauses.from.collection,
            rows = rows.len(),
            sub_queries = compiled.sub_queries.len(),
            "nestql.exec"
        );

        let mut items = Vec::with_capacity(rows.len());

        for row in &rows {
            let mut sub_results = Vec::with_capacity(compiled.sub_queries.len());
            for sub_query in &compiled.sub_queries {
                sub_results.push(self.sub_query(sub_query, row).await?);
            }

            items.push(map_result(
                &compiled.alias_mapping,
                row,
                &sub_results,
                ColumnIndex::alias,
            )?);
        }

        Ok(items)
    }

    async fn sub_query(&self, sub_query: &SubQuery, row: &Row) -> Result<Value> {
        match sub_query {
            SubQuery::Many(many) => {
                let values = many.identifier_values(row, ColumnIndex::alias);
                if values.iter().any(Value::is_null) {
                    return Ok(Value::Array(vec![]));
                }

                let mut items = self.exec(&many.query(&values)?).await?;
                apply_nested_modifiers(&mut items, &many.modifiers);
                Ok(Value::Array(items))
            }
            SubQuery::UnionMany(union) => {
                let mut out = Map::new();

                let values = union.identifier_values(row, ColumnIndex::alias);
                if values.iter().any(Value::is_null) {
                    for target in &union.targets {
                        out.insert(target.collection.clone(), Value::Array(vec![]));
                    }
                    return Ok(Value::Object(out));
                }

                for query in union.queries(row, ColumnIndex::alias)? {
                    let mut items = self.exec(&query.result).await?;
                    apply_nested_modifiers(&mut items, &union.modifiers);
                    out.insert(query.collection, Value::Array(items));
                }

                Ok(Value::Object(out))
            }
        }
    }
}
