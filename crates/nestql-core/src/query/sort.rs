use crate::stmt::Direction;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sort by one field. Written `field` or `-field` for descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Sort {
        Sort {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Sort {
        Sort {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    pub fn parse(input: &str) -> Sort {
        match input.strip_prefix('-') {
            Some(field) => Sort::desc(field),
            None => Sort::asc(input),
        }
    }
}

impl std::fmt::Display for Sort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.direction.is_desc() {
            f.write_str("-")?;
        }
        f.write_str(&self.field)
    }
}

impl Serialize for Sort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Sort {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Sort, D::Error> {
        let input = String::deserialize(deserializer)?;
        Ok(Sort::parse(&input))
    }
}
