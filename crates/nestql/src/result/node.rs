use crate::convert::A2oReference;
use crate::query::Modifiers;
use crate::schema::{Relation, RelationType};
use crate::stmt::Value;
use crate::{Error, Result, Schema};

use indexmap::IndexMap;
use serde_json::json;

/// Which side of a relation a nested field reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedKind {
    M2o,
    O2m,
    A2o,
}

/// A relational field whose items were fetched separately and must be
/// attached to their parent items.
#[derive(Debug, Clone)]
pub struct NestedCollectionNode {
    pub kind: NestedKind,

    /// The collection the parent items belong to.
    pub parent_collection: String,

    /// The key the nested value is written under on each parent.
    pub field_key: String,

    pub relation: Relation,

    /// Sort and pagination for the items attached to each parent.
    pub modifiers: Modifiers,
}

/// The item an any-to-one parent points at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct A2oTarget {
    pub(crate) collection: String,

    /// `(column, value)` pairs identifying the item in `collection`.
    pub(crate) key: Vec<(String, Value)>,
}

impl NestedCollectionNode {
    /// Resolves `collection.field` against the schema.
    pub fn new(
        schema: &Schema,
        collection: &str,
        field: &str,
        modifiers: Modifiers,
    ) -> Result<NestedCollectionNode> {
        let info = schema
            .relation_info(collection, field)
            .ok_or_else(|| Error::missing_relation(collection, field))?;

        let kind = match info.ty {
            RelationType::M2o => NestedKind::M2o,
            RelationType::O2m => NestedKind::O2m,
            RelationType::A2o => NestedKind::A2o,
            RelationType::O2a => {
                return Err(Error::invalid_query(format!(
                    "`{collection}.{field}` is one-to-any; its items are grouped by collection \
                     and cannot be attached by key"
                )))
            }
        };

        Ok(NestedCollectionNode {
            kind,
            parent_collection: collection.to_string(),
            field_key: field.to_string(),
            relation: info.relation.clone(),
            modifiers,
        })
    }

    /// Filters selecting the nested items `parents` reference, keyed by the
    /// collection to read. Parents without a key are skipped. A collection
    /// with no referenced keys gets no entry.
    pub fn parent_filters(&self, schema: &Schema, parents: &[Value]) -> IndexMap<String, Value> {
        let mut filters = IndexMap::new();

        match self.kind {
            NestedKind::M2o => {
                let Some(related) = &self.relation.related_collection else {
                    return filters;
                };

                let keys = distinct(parents.iter().filter_map(|parent| {
                    key_values(parent, &self.relation.fields, &self.relation.related_fields)
                }));

                if !keys.is_empty() {
                    filters.insert(
                        related.clone(),
                        key_filter(&self.relation.related_fields, keys),
                    );
                }
            }
            NestedKind::O2m => {
                let keys = distinct(parents.iter().filter_map(|parent| {
                    key_values(
                        parent,
                        &self.relation.related_fields,
                        &self.relation.related_fields,
                    )
                }));

                if !keys.is_empty() {
                    filters.insert(
                        self.relation.collection.clone(),
                        key_filter(&self.relation.fields, keys),
                    );
                }
            }
            NestedKind::A2o => {
                let mut grouped: IndexMap<String, (Vec<String>, Vec<Vec<Value>>)> =
                    IndexMap::new();

                for target in parents
                    .iter()
                    .filter_map(|parent| self.a2o_target(schema, parent))
                {
                    let (columns, values): (Vec<_>, Vec<_>) = target.key.into_iter().unzip();
                    let entry = grouped
                        .entry(target.collection)
                        .or_insert_with(|| (columns, vec![]));
                    entry.1.push(values);
                }

                for (collection, (columns, keys)) in grouped {
                    filters.insert(collection, key_filter(&columns, distinct(keys.into_iter())));
                }
            }
        }

        filters
    }

    /// Reads the collection and key an any-to-one parent references, either
    /// from the relation's collection field or from the JSON discriminator.
    pub(crate) fn a2o_target(&self, schema: &Schema, parent: &Value) -> Option<A2oTarget> {
        match &self.relation.one_collection_field {
            Some(collection_field) => {
                let collection = parent.get(collection_field)?.as_str()?;
                let primary = &schema.collection(collection)?.primary;
                let values = key_values(parent, std::slice::from_ref(&self.field_key), primary)?;

                Some(A2oTarget {
                    collection: collection.to_string(),
                    key: primary.iter().cloned().zip(values).collect(),
                })
            }
            None => {
                let reference = A2oReference::from_value(parent.get(&self.field_key)?)?;

                Some(A2oTarget {
                    collection: reference.foreign_collection,
                    key: reference
                        .foreign_key
                        .into_iter()
                        .map(|part| (part.column, part.value))
                        .collect(),
                })
            }
        }
    }
}

/// Reads a key off an item, one value per field. A single field that was
/// already replaced by its related item is read through that item using
/// `related_fields`. `None` if any part is missing or null.
pub(crate) fn key_values(
    item: &Value,
    fields: &[String],
    related_fields: &[String],
) -> Option<Vec<Value>> {
    if let ([field], [related]) = (fields, related_fields) {
        if let Some(Value::Object(related_item)) = item.get(field) {
            return related_item
                .get(related)
                .filter(|value| !value.is_null())
                .map(|value| vec![value.clone()]);
        }
    }

    fields
        .iter()
        .map(|field| item.get(field).filter(|value| !value.is_null()).cloned())
        .collect()
}

fn distinct(keys: impl Iterator<Item = Vec<Value>>) -> Vec<Vec<Value>> {
    let mut out: Vec<Vec<Value>> = vec![];
    for key in keys {
        if !key.is_empty() && !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

/// `{ col: { _in: [..] } }` for single-column keys, an `_or` of `_and`
/// groups otherwise.
fn key_filter(columns: &[String], keys: Vec<Vec<Value>>) -> Value {
    if let [column] = columns {
        let values: Vec<Value> = keys
            .into_iter()
            .filter_map(|key| key.into_iter().next())
            .collect();
        return json!({ column: { "_in": values } });
    }

    let groups: Vec<Value> = keys
        .into_iter()
        .map(|key| {
            let parts: Vec<Value> = columns
                .iter()
                .zip(key)
                .map(|(column, value)| json!({ column: { "_eq": value } }))
                .collect();
            json!({ "_and": parts })
        })
        .collect();

    json!({ "_or": groups })
}
