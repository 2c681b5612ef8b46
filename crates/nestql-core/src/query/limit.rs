use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A row limit. Serialized as an integer, `-1` meaning unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Unlimited,
}

impl Limit {
    pub fn count(self) -> Option<u64> {
        match self {
            Limit::Count(count) => Some(count),
            Limit::Unlimited => None,
        }
    }

    /// Parses the wire form: a non-negative count, or `-1` for no limit.
    pub fn from_i64(value: i64) -> Option<Limit> {
        match value {
            -1 => Some(Limit::Unlimited),
            value => u64::try_from(value).ok().map(Limit::Count),
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Count(count) => serializer.serialize_u64(*count),
            Limit::Unlimited => serializer.serialize_i64(-1),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Limit, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Limit::from_i64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid limit {value}")))
    }
}
