use crate::convert::A2oReference;
use crate::mapping::{A2oMapping, AliasMapping};
use crate::stmt::{ColumnIndex, Value};
use crate::{Error, Result, Row};

use serde_json::Map;

/// Builds one nested item from a flat `row` by walking `mapping`.
///
/// `sub_results[i]` is the already-executed result of the compiled query's
/// `i`th sub-query for this row; it is spliced in unchanged. `column_alias`
/// names the row key a column index is returned under.
pub fn map_result<F>(
    mapping: &[AliasMapping],
    row: &Row,
    sub_results: &[Value],
    column_alias: F,
) -> Result<Value>
where
    F: Fn(ColumnIndex) -> String,
{
    let cx = Cx {
        row,
        sub_results,
        column_alias: &column_alias,
    };
    cx.map(mapping).map(Value::Object)
}

struct Cx<'a, F> {
    row: &'a Row,
    sub_results: &'a [Value],
    column_alias: &'a F,
}

impl<F> Cx<'_, F>
where
    F: Fn(ColumnIndex) -> String,
{
    fn map(&self, mapping: &[AliasMapping]) -> Result<Map<String, Value>> {
        let mut out = Map::new();

        for entry in mapping {
            let value = match entry {
                AliasMapping::Root { column, .. } => self.column(*column).clone(),
                AliasMapping::Nested {
                    identifiers,
                    children,
                    ..
                } => {
                    if self.all_null(identifiers) {
                        Value::Null
                    } else {
                        Value::Object(self.map(children)?)
                    }
                }
                AliasMapping::Sub { alias, index } => {
                    self.sub_results.get(*index).cloned().ok_or_else(|| {
                        Error::invalid_result(format!(
                            "`{alias}` reads sub-result {index}, but {} were supplied",
                            self.sub_results.len()
                        ))
                    })?
                }
                AliasMapping::NestedA2o {
                    discriminator,
                    collections,
                    ..
                } => match self.branch(*discriminator, collections) {
                    Some(branch) => Value::Object(self.map(&branch.mapping)?),
                    None => Value::Null,
                },
            };

            out.insert(entry.alias().to_string(), value);
        }

        Ok(out)
    }

    fn column(&self, column: ColumnIndex) -> &Value {
        self.row
            .get(&(self.column_alias)(column))
            .unwrap_or(&Value::Null)
    }

    /// `true` when there are key columns and every one of them is null.
    fn all_null(&self, columns: &[ColumnIndex]) -> bool {
        !columns.is_empty() && columns.iter().all(|column| self.column(*column).is_null())
    }

    /// Picks the candidate whose joined key is present. The collection named
    /// by the discriminator wins if its key is present.
    fn branch<'m>(
        &self,
        discriminator: ColumnIndex,
        collections: &'m [A2oMapping],
    ) -> Option<&'m A2oMapping> {
        let present = |branch: &&'m A2oMapping| {
            !branch.identifiers.is_empty()
                && branch
                    .identifiers
                    .iter()
                    .all(|column| !self.column(*column).is_null())
        };

        let named = A2oReference::from_value(self.column(discriminator))
            .and_then(|reference| {
                collections
                    .iter()
                    .find(|branch| branch.collection == reference.foreign_collection)
            })
            .filter(present);

        named.or_else(|| collections.iter().find(present))
    }
}
