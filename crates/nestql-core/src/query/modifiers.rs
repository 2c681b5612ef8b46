use super::{Limit, Sort};
use crate::stmt::Value;

use serde::{Deserialize, Serialize};

/// Filtering, ordering, and pagination for one level of a query.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sort>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
}

impl Modifiers {
    /// The offset after applying `page`: a page past the first skips
    /// `limit * (page - 1)` rows and replaces any explicit offset.
    pub fn effective_offset(&self) -> Option<u64> {
        match (self.page, self.limit) {
            (Some(page), Some(Limit::Count(limit))) if page > 1 => Some(limit * (page - 1)),
            _ => self.offset,
        }
    }
}
