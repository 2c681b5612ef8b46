use crate::query::{Modifiers, Sort};
use crate::stmt::Value;

use std::cmp::Ordering;

/// Applies a nested level's pagination and sort to the items attached to one
/// parent.
///
/// Items are sliced first and sorted after: a page past the first drops
/// `limit * (page - 1)` items, then `offset` more are dropped, then the rest
/// is cut to `limit`. The remaining items are stably sorted by the first
/// sort key. Nulls sort last ascending and first descending.
pub fn apply_nested_modifiers(items: &mut Vec<Value>, modifiers: &Modifiers) {
    let limit = modifiers.limit.and_then(|limit| limit.count());

    if let (Some(page), Some(limit)) = (modifiers.page, limit) {
        if page > 1 {
            skip(items, limit.saturating_mul(page - 1));
        }
    }

    if let Some(offset) = modifiers.offset {
        skip(items, offset);
    }

    if let Some(limit) = limit {
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    if let Some(sort) = modifiers.sort.first() {
        sort_items(items, sort);
    }
}

fn skip(items: &mut Vec<Value>, count: u64) {
    let count = usize::try_from(count).unwrap_or(usize::MAX).min(items.len());
    items.drain(..count);
}

pub(crate) fn sort_items(items: &mut [Value], sort: &Sort) {
    items.sort_by(|a, b| {
        let ordering = compare_nulls_last(
            a.get(&sort.field).unwrap_or(&Value::Null),
            b.get(&sort.field).unwrap_or(&Value::Null),
        );

        if sort.direction.is_desc() {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_nulls_last(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare_values(a, b),
    }
}

/// Total order over non-null values. Values of different kinds order by kind:
/// booleans, numbers, strings, then arrays and objects.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) | Value::Object(_) => 4,
    }
}
