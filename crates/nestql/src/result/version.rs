use super::key::Key;
use crate::schema::RelationType;
use crate::stmt::Value;
use crate::Schema;

use serde_json::Map;
use std::collections::HashSet;

const CREATE: &str = "create";
const UPDATE: &str = "update";
const DELETE: &str = "delete";

/// Overlays each version's fields onto `item`, in order. Later versions win.
pub fn merge_versions_raw(item: &Value, versions: &[Value]) -> Value {
    versions.iter().fold(item.clone(), |mut merged, version| {
        match (&mut merged, version) {
            (Value::Object(merged), Value::Object(version)) => {
                for (field, value) in version {
                    merged.insert(field.clone(), value.clone());
                }
            }
            (merged, version) => *merged = version.clone(),
        }
        merged
    })
}

/// Overlays versions onto `item`, descending into related items.
///
/// Many-to-one and any-to-one values that are objects on both sides merge
/// field by field in the related collection. One-to-many values shaped as
/// `{ create, update, delete }` alter the current list: deleted keys are
/// dropped, updates merge into the item with the same primary key (or are
/// appended), and creates are appended. Any other value replaces the
/// current one.
pub fn merge_versions_recursive(
    item: &Value,
    versions: &[Value],
    collection: &str,
    schema: &Schema,
) -> Value {
    versions.iter().fold(item.clone(), |merged, version| {
        merge(merged, version, Some(collection), schema)
    })
}

fn merge(current: Value, version: &Value, collection: Option<&str>, schema: &Schema) -> Value {
    let (Value::Object(mut current), Value::Object(version)) = (current, version) else {
        return version.clone();
    };

    for (field, value) in version {
        let existing = current.get(field).cloned().unwrap_or(Value::Null);
        let merged = merge_field(&current, version, field, existing, value, collection, schema);
        current.insert(field.clone(), merged);
    }

    Value::Object(current)
}

fn merge_field(
    current: &Map<String, Value>,
    version: &Map<String, Value>,
    field: &str,
    existing: Value,
    value: &Value,
    collection: Option<&str>,
    schema: &Schema,
) -> Value {
    let Some(info) = collection.and_then(|collection| schema.relation_info(collection, field))
    else {
        return value.clone();
    };

    match info.ty {
        RelationType::M2o => merge(existing, value, info.target(), schema),
        RelationType::A2o => {
            let target = info.relation.one_collection_field.as_ref().and_then(|name| {
                version
                    .get(name)
                    .or_else(|| current.get(name))
                    .and_then(Value::as_str)
            });
            merge(existing, value, target, schema)
        }
        RelationType::O2m | RelationType::O2a => match alterations(value) {
            Some(alterations) => apply_alterations(existing, alterations, info.target(), schema),
            None => value.clone(),
        },
    }
}

struct Alterations<'a> {
    create: &'a [Value],
    update: &'a [Value],
    delete: &'a [Value],
}

fn alterations(value: &Value) -> Option<Alterations<'_>> {
    let object = value.as_object()?;

    let known = |key: &String| [CREATE, UPDATE, DELETE].contains(&key.as_str());
    if object.is_empty() || !object.keys().all(known) {
        return None;
    }

    Some(Alterations {
        create: list(object, CREATE)?,
        update: list(object, UPDATE)?,
        delete: list(object, DELETE)?,
    })
}

/// A missing list is empty; a present one must be an array.
fn list<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    match object.get(key) {
        None => Some(&[][..]),
        Some(value) => value.as_array().map(Vec::as_slice),
    }
}

fn apply_alterations(
    existing: Value,
    alterations: Alterations<'_>,
    collection: Option<&str>,
    schema: &Schema,
) -> Value {
    let primary = collection
        .and_then(|collection| schema.collection(collection))
        .and_then(|collection| collection.primary.first())
        .map(String::as_str)
        .unwrap_or("id");

    let deleted: HashSet<Key> = alterations
        .delete
        .iter()
        .filter_map(|item| item_key(item, primary))
        .collect();

    let mut updates: Vec<(Option<Key>, &Value)> = alterations
        .update
        .iter()
        .map(|update| (item_key(update, primary), update))
        .collect();

    let existing = match existing {
        Value::Array(items) => items,
        _ => vec![],
    };

    let mut out = vec![];

    for item in existing {
        let key = item_key(&item, primary);

        if key.as_ref().is_some_and(|key| deleted.contains(key)) {
            continue;
        }

        let position = key
            .as_ref()
            .and_then(|key| updates.iter().position(|(update, _)| update.as_ref() == Some(key)));

        match position {
            Some(position) => {
                let (_, update) = updates.remove(position);
                out.push(merge(item, update, collection, schema));
            }
            None => out.push(item),
        }
    }

    out.extend(updates.into_iter().map(|(_, update)| update.clone()));
    out.extend(alterations.create.iter().cloned());

    Value::Array(out)
}

/// An item's primary key: the value itself for a bare key, the primary
/// field for an object.
fn item_key(item: &Value, primary: &str) -> Option<Key> {
    match item {
        Value::Object(item) => item.get(primary).and_then(Key::of),
        item => Key::of(item),
    }
}
