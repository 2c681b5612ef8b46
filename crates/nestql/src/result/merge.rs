use super::key::Key;
use super::node::{key_values, NestedCollectionNode, NestedKind};
use super::paginate::apply_nested_modifiers;
use crate::stmt::Value;
use crate::{Error, Result, Schema};

use indexmap::IndexMap;
use std::collections::HashMap;

/// Items fetched for a nested field.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedItems {
    List(Vec<Value>),

    /// Any-to-one targets, grouped by the collection they were read from.
    ByCollection(IndexMap<String, Vec<Value>>),
}

/// Whether the caller may read the nested field, for every parent at once
/// or per parent by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAllowed {
    All(bool),
    PerItem(Vec<bool>),
}

impl FieldAllowed {
    /// Parents past the end of a per-item list are not allowed.
    pub fn allows(&self, index: usize) -> bool {
        match self {
            FieldAllowed::All(allowed) => *allowed,
            FieldAllowed::PerItem(allowed) => allowed.get(index).copied().unwrap_or(false),
        }
    }
}

impl From<bool> for FieldAllowed {
    fn from(value: bool) -> FieldAllowed {
        FieldAllowed::All(value)
    }
}

impl From<Vec<bool>> for FieldAllowed {
    fn from(value: Vec<bool>) -> FieldAllowed {
        FieldAllowed::PerItem(value)
    }
}

/// Attaches separately fetched nested items to their parents under
/// `node.field_key` and returns the parents.
///
/// Many-to-one and any-to-one fields get the matching item or `null`.
/// One-to-many fields get an array, sliced and sorted by the node's
/// modifiers. Parents the caller may not read the field on get `null`.
pub fn merge_with_parent_items(
    schema: &Schema,
    nested: NestedItems,
    mut parents: Vec<Value>,
    node: &NestedCollectionNode,
    field_allowed: &FieldAllowed,
) -> Result<Vec<Value>> {
    if parents.iter().any(|parent| !parent.is_object()) {
        return Err(Error::invalid_result(format!(
            "parents of `{}.{}` must be objects",
            node.parent_collection, node.field_key
        )));
    }

    match (node.kind, nested) {
        (NestedKind::M2o, NestedItems::List(items)) => {
            merge_m2o(items, &mut parents, node, field_allowed)
        }
        (NestedKind::O2m, NestedItems::List(items)) => {
            merge_o2m(items, &mut parents, node, field_allowed)?
        }
        (NestedKind::A2o, NestedItems::ByCollection(items)) => {
            merge_a2o(schema, items, &mut parents, node, field_allowed)
        }
        (kind, _) => {
            return Err(Error::invalid_result(format!(
                "nested items for `{}.{}` are not shaped for a {kind:?} field",
                node.parent_collection, node.field_key
            )))
        }
    }

    tracing::trace!(
        collection = %node.parent_collection,
        field = %node.field_key,
        parents = parents.len(),
        "nestql.merge"
    );

    Ok(parents)
}

fn merge_m2o(
    items: Vec<Value>,
    parents: &mut [Value],
    node: &NestedCollectionNode,
    field_allowed: &FieldAllowed,
) {
    let relation = &node.relation;

    let mut by_key: HashMap<Key, Value> = HashMap::new();
    for item in items {
        let key = Key::composite(relation.related_fields.iter().map(|field| item.get(field)));
        if let Some(key) = key {
            by_key.entry(key).or_insert(item);
        }
    }

    for (index, parent) in parents.iter_mut().enumerate() {
        let value = if field_allowed.allows(index) {
            key_values(parent, &relation.fields, &relation.related_fields)
                .and_then(|values| Key::composite(values.iter().map(Some)))
                .and_then(|key| by_key.get(&key).cloned())
                .unwrap_or(Value::Null)
        } else {
            Value::Null
        };

        set(parent, &node.field_key, value);
    }
}

fn merge_o2m(
    items: Vec<Value>,
    parents: &mut [Value],
    node: &NestedCollectionNode,
    field_allowed: &FieldAllowed,
) -> Result<()> {
    let relation = &node.relation;
    let parent_key = &relation.related_fields;
    let foreign_key = &relation.fields;

    // Disallowed parents still own their items; only their output is hidden.
    let mut by_key: HashMap<Key, usize> = HashMap::new();
    for (index, parent) in parents.iter_mut().enumerate() {
        if let Some(key) = Key::composite(parent_key.iter().map(|field| parent.get(field))) {
            if by_key.insert(key.clone(), index).is_some() {
                return Err(Error::duplicate_parent_key(
                    &node.parent_collection,
                    key.to_string(),
                ));
            }
        }

        let empty = if field_allowed.allows(index) {
            Value::Array(vec![])
        } else {
            Value::Null
        };
        set(parent, &node.field_key, empty);
    }

    for item in items {
        if item.is_null() {
            continue;
        }

        // An array foreign key lists no single owner; the item goes to
        // every readable parent.
        if let [field] = &foreign_key[..] {
            if item.get(field).is_some_and(Value::is_array) {
                for (index, parent) in parents.iter_mut().enumerate() {
                    if field_allowed.allows(index) {
                        push(parent, &node.field_key, item.clone());
                    }
                }
                continue;
            }
        }

        let key = key_values(&item, foreign_key, parent_key)
            .and_then(|values| Key::composite(values.iter().map(Some)));

        let index = key.as_ref().and_then(|key| by_key.get(key)).copied();
        let Some(index) = index else {
            let key = key.map(|key| key.to_string()).unwrap_or_else(|| "null".to_string());
            return Err(Error::dangling_reference(
                &relation.collection,
                foreign_key.join(", "),
                key,
            ));
        };

        if field_allowed.allows(index) {
            push(&mut parents[index], &node.field_key, item);
        }
    }

    for (index, parent) in parents.iter_mut().enumerate() {
        if !field_allowed.allows(index) {
            continue;
        }
        if let Some(Value::Array(items)) = parent.get_mut(&node.field_key) {
            apply_nested_modifiers(items, &node.modifiers);
        }
    }

    Ok(())
}

fn merge_a2o(
    schema: &Schema,
    items: IndexMap<String, Vec<Value>>,
    parents: &mut [Value],
    node: &NestedCollectionNode,
    field_allowed: &FieldAllowed,
) {
    for (index, parent) in parents.iter_mut().enumerate() {
        let value = if field_allowed.allows(index) {
            node.a2o_target(schema, parent)
                .and_then(|target| {
                    let (columns, values): (Vec<_>, Vec<_>) = target.key.into_iter().unzip();
                    let key = Key::composite(values.iter().map(Some))?;

                    items.get(&target.collection)?.iter().find(|item| {
                        Key::composite(columns.iter().map(|column| item.get(column)))
                            .is_some_and(|candidate| candidate == key)
                    })
                })
                .cloned()
                .unwrap_or(Value::Null)
        } else {
            Value::Null
        };

        set(parent, &node.field_key, value);
    }
}

fn set(parent: &mut Value, field: &str, value: Value) {
    if let Value::Object(parent) = parent {
        parent.insert(field.to_string(), value);
    }
}

fn push(parent: &mut Value, field: &str, item: Value) {
    if let Some(Value::Array(items)) = parent.get_mut(field) {
        items.push(item);
    }
}
