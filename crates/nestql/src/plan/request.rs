use crate::stmt::Value;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A read request as a client states it: field paths and query parameters.
///
/// `fields` entries are dotted paths (`author.name`), wildcards (`*`,
/// `author.*`), scoped any-to-one paths (`item:posts.title`), or JSON reads
/// (`json(metadata, color.hex)`). `alias` maps an output name used in
/// `fields` to the field it reads.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub collection: String,

    #[serde(default)]
    pub fields: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub alias: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,

    /// `-1` for no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    /// Per-relation modifiers, keyed by field name: `{ "comments": { "_limit": 5 } }`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep: Option<Value>,
}

impl Request {
    pub fn new<I, S>(collection: impl Into<String>, fields: I) -> Request
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Request {
            collection: collection.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            ..Request::default()
        }
    }
}
