use crate::query::{Limit, Modifiers, Sort};
use crate::stmt::Value;
use crate::{Error, Result};

use indexmap::IndexMap;
use serde_json::Map;

const ALIAS: &str = "_alias";
const FILTER: &str = "_filter";
const LIMIT: &str = "_limit";
const OFFSET: &str = "_offset";
const PAGE: &str = "_page";
const SORT: &str = "_sort";

/// One level of a request's `deep` object.
///
/// Underscore keys are modifiers for the relation at this level; other keys
/// name fields below it (`field` or `field:collection`).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Deep<'a> {
    object: Option<&'a Map<String, Value>>,
}

impl<'a> Deep<'a> {
    pub(crate) fn new(value: Option<&'a Value>) -> Result<Deep<'a>> {
        match value {
            None | Some(Value::Null) => Ok(Deep { object: None }),
            Some(Value::Object(object)) => Ok(Deep {
                object: Some(object),
            }),
            Some(other) => Err(Error::invalid_query(format!(
                "deep entries must be objects, got {other}"
            ))),
        }
    }

    /// The level below `key`, or below the first of `keys` that is present.
    pub(crate) fn child(&self, keys: &[&str]) -> Result<Deep<'a>> {
        let value = self
            .object
            .and_then(|object| keys.iter().find_map(|key| object.get(*key)));
        Deep::new(value)
    }

    pub(crate) fn alias(&self) -> Result<IndexMap<String, String>> {
        let Some(value) = self.get(ALIAS) else {
            return Ok(IndexMap::new());
        };

        serde_json::from_value(value.clone()).map_err(|_| {
            Error::invalid_query(format!("`{ALIAS}` must map names to fields, got {value}"))
        })
    }

    pub(crate) fn modifiers(&self) -> Result<Modifiers> {
        let mut modifiers = Modifiers::default();

        let Some(object) = self.object else {
            return Ok(modifiers);
        };

        for (key, value) in object {
            match key.as_str() {
                FILTER => modifiers.filter = Some(value.clone()),
                SORT => modifiers.sort = parse_sort(value)?,
                LIMIT => {
                    modifiers.limit = Some(
                        value
                            .as_i64()
                            .and_then(Limit::from_i64)
                            .ok_or_else(|| bad_value(LIMIT, value))?,
                    )
                }
                OFFSET => modifiers.offset = Some(count(OFFSET, value)?),
                PAGE => modifiers.page = Some(count(PAGE, value)?),
                ALIAS => {}
                key if key.starts_with('_') => {
                    return Err(Error::invalid_query(format!("unknown deep modifier `{key}`")))
                }
                _ => {}
            }
        }

        Ok(modifiers)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.and_then(|object| object.get(key))
    }
}

/// Sort keys from a comma separated string or an array of strings.
pub(crate) fn parse_sort(value: &Value) -> Result<Vec<Sort>> {
    match value {
        Value::String(sort) => Ok(sort
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(Sort::parse)
            .collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(Sort::parse)
                    .ok_or_else(|| bad_value(SORT, item))
            })
            .collect(),
        _ => Err(bad_value(SORT, value)),
    }
}

fn count(key: &str, value: &Value) -> Result<u64> {
    value.as_u64().ok_or_else(|| bad_value(key, value))
}

fn bad_value(key: &str, value: &Value) -> Error {
    Error::invalid_query(format!("invalid value for `{key}`: {value}"))
}
