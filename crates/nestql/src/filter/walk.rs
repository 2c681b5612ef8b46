use super::{is_operator, split_scope, FilterContext, Quantity};
use crate::schema::{Collection, Relation, RelationType, Schema};
use crate::stmt::Value;
use crate::{Error, Result};

use serde_json::Map;

/// Walks `filter` against `collection`, passing every field entry to
/// `visit` after its nested filter (if any) has been walked.
///
/// `visit` returns the entry to keep, possibly rewritten, or `None` to drop
/// it. Logical groups are kept as arrays of the walked sub-filters.
///
/// Fails with an invalid query error when `_and` / `_or` is not an array of
/// objects, or when a filter descends into a polymorphic field without a
/// `field:collection` scope.
pub fn deep_map_filter<F>(
    filter: &Value,
    visit: F,
    schema: &Schema,
    collection: &str,
) -> Result<Value>
where
    F: FnMut((String, Value), &FilterContext<'_>) -> Option<(String, Value)>,
{
    let collection = schema.require_collection(collection)?;

    let Value::Object(object) = filter else {
        return Err(Error::invalid_query("a filter must be an object"));
    };

    let mut walker = Walker { schema, visit };
    let mut path = vec![];
    let mapped = walker.map_object(object, collection, &mut path)?;
    Ok(Value::Object(mapped))
}

struct Walker<'a, F> {
    schema: &'a Schema,
    visit: F,
}

/// The related collection and relation a nested filter descends into.
struct Descent<'a> {
    collection: &'a Collection,
    relation: &'a Relation,
    ty: RelationType,
}

impl<'a, F> Walker<'a, F>
where
    F: FnMut((String, Value), &FilterContext<'_>) -> Option<(String, Value)>,
{
    fn map_object(
        &mut self,
        object: &Map<String, Value>,
        collection: &'a Collection,
        path: &mut Vec<String>,
    ) -> Result<Map<String, Value>> {
        let mut out = Map::new();

        for (key, value) in object {
            if key == "_and" || key == "_or" {
                let Value::Array(items) = value else {
                    return Err(Error::invalid_query(format!(
                        "`{key}` expects an array of filters"
                    )));
                };

                let mut mapped = Vec::with_capacity(items.len());
                for item in items {
                    let Value::Object(item) = item else {
                        return Err(Error::invalid_query(format!(
                            "`{key}` entries must be objects"
                        )));
                    };
                    mapped.push(Value::Object(self.map_object(item, collection, path)?));
                }

                out.insert(key.clone(), Value::Array(mapped));
                continue;
            }

            if is_operator(key) {
                out.insert(key.clone(), value.clone());
                continue;
            }

            let (name, _) = split_scope(key);
            path.push(name.to_string());
            let entry = self.map_field(key, value, collection, path);
            path.pop();

            if let Some((key, value)) = entry? {
                out.insert(key, value);
            }
        }

        Ok(out)
    }

    fn map_field(
        &mut self,
        key: &str,
        value: &Value,
        collection: &'a Collection,
        path: &mut Vec<String>,
    ) -> Result<Option<(String, Value)>> {
        let (name, scope) = split_scope(key);
        let field = collection.field(name);
        let info = self.schema.relation_info(&collection.name, name);

        let body = relational_body(value);

        let (mapped, descent, quantity) = match (info, body) {
            (Some(info), Some(body)) => {
                let descent =
                    self.descend(key, &collection.name, name, scope, info.relation, info.ty)?;

                if info.is_many() {
                    let (quantity, inner) = split_quantity(key, body)?;
                    let mapped = self.map_object(inner, descent.collection, path)?;
                    let mapped = match quantity {
                        Some(quantity) => {
                            let mut wrapped = Map::new();
                            wrapped.insert(quantity.key().to_string(), Value::Object(mapped));
                            wrapped
                        }
                        None => mapped,
                    };
                    (
                        Value::Object(mapped),
                        Some(descent),
                        Some(quantity.unwrap_or(Quantity::Some)),
                    )
                } else {
                    let mapped = self.map_object(body, descent.collection, path)?;
                    (Value::Object(mapped), Some(descent), None)
                }
            }
            _ => (value.clone(), None, None),
        };

        let context = FilterContext {
            collection,
            field,
            relation: descent
                .as_ref()
                .map(|descent| descent.relation)
                .or(info.map(|info| info.relation)),
            relation_type: descent
                .as_ref()
                .map(|descent| descent.ty)
                .or(info.map(|info| info.ty)),
            quantity,
            leaf: descent.is_none(),
            path: path.as_slice(),
        };

        Ok((self.visit)((key.to_string(), mapped), &context))
    }

    /// Resolves the collection a relational filter entry descends into.
    fn descend(
        &self,
        key: &str,
        collection: &str,
        name: &str,
        scope: Option<&str>,
        relation: &'a Relation,
        ty: RelationType,
    ) -> Result<Descent<'a>> {
        let (relation, target) = match ty {
            RelationType::M2o => (relation, relation.related_collection.as_deref()),
            RelationType::O2m => (relation, Some(relation.collection.as_str())),
            RelationType::A2o => {
                let scope = require_scope(key, name, scope)?;
                if !relation.allows_collection(scope) {
                    return Err(Error::invalid_query(format!(
                        "`{key}` scopes `{name}` to `{scope}`, which it cannot reference"
                    )));
                }
                (relation, Some(scope))
            }
            RelationType::O2a => {
                let scope = require_scope(key, name, scope)?;
                let Some(relation) = self
                    .schema
                    .o2a_relations(collection, name)
                    .into_iter()
                    .find(|relation| relation.collection == scope)
                else {
                    return Err(Error::invalid_query(format!(
                        "`{key}` scopes `{name}` to `{scope}`, which does not reference `{collection}`"
                    )));
                };
                (relation, Some(scope))
            }
        };

        let Some(target) = target else {
            return Err(Error::missing_relation(collection, name));
        };

        Ok(Descent {
            collection: self.schema.require_collection(target)?,
            relation,
            ty,
        })
    }
}

fn require_scope<'k>(key: &str, name: &str, scope: Option<&'k str>) -> Result<&'k str> {
    scope.ok_or_else(|| {
        Error::invalid_query(format!(
            "`{key}` filters a polymorphic field; name the collection as `{name}:<collection>`"
        ))
    })
}

/// A value descends into a related collection when it is an object with a
/// field key, a logical group, or a quantifier.
fn relational_body(value: &Value) -> Option<&Map<String, Value>> {
    let Value::Object(object) = value else {
        return None;
    };

    let descends = object.keys().any(|key| {
        !is_operator(key)
            || matches!(key.as_str(), "_and" | "_or")
            || Quantity::from_key(key).is_some()
    });

    descends.then_some(object)
}

/// Splits `{ "_none": { .. } }` into its quantifier and inner filter.
fn split_quantity<'v>(
    key: &str,
    body: &'v Map<String, Value>,
) -> Result<(Option<Quantity>, &'v Map<String, Value>)> {
    let mut quantifiers = body
        .iter()
        .filter_map(|(k, v)| Quantity::from_key(k).map(|quantity| (quantity, v)));

    let Some((quantity, inner)) = quantifiers.next() else {
        return Ok((None, body));
    };

    if body.len() != 1 {
        return Err(Error::invalid_query(format!(
            "`{key}` mixes `{}` with other keys",
            quantity.key()
        )));
    }

    match inner {
        Value::Object(inner) => Ok((Some(quantity), inner)),
        _ => Err(Error::invalid_query(format!(
            "`{key}.{}` expects a filter object",
            quantity.key()
        ))),
    }
}
