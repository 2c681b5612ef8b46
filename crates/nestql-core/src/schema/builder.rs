use super::{Collection, Field, FieldType, Relation, Schema};
use crate::Result;

use indexmap::IndexMap;

/// Builds a [`Schema`], filling in relation defaults and verifying the result.
#[derive(Debug, Default)]
pub struct Builder {
    collections: IndexMap<String, Collection>,
    relations: Vec<Relation>,
}

/// Defines one collection inside [`Builder::collection`].
#[derive(Debug)]
pub struct CollectionBuilder {
    collection: Collection,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(
        mut self,
        name: &str,
        f: impl FnOnce(CollectionBuilder) -> CollectionBuilder,
    ) -> Self {
        let builder = f(CollectionBuilder {
            collection: Collection {
                name: name.to_string(),
                primary: vec![],
                fields: IndexMap::new(),
            },
        });
        self.collections.insert(name.to_string(), builder.collection);
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut schema = Schema {
            collections: self.collections,
            relations: Vec::with_capacity(self.relations.len()),
        };

        for mut relation in self.relations {
            if let Some(related) = &relation.related_collection {
                let Some(target) = schema.collections.get_mut(related) else {
                    return Err(crate::Error::invalid_schema(format!(
                        "relation `{}.{}` references unknown collection `{}`",
                        relation.collection, relation.field, related
                    )));
                };

                if relation.related_fields.is_empty() {
                    relation.related_fields = target.primary.clone();
                }

                if let Some(one_field) = &relation.one_field {
                    add_alias(target, one_field);
                }
            } else if let Some(one_field) = &relation.one_field {
                for allowed in &relation.one_allowed_collections {
                    if let Some(target) = schema.collections.get_mut(allowed) {
                        add_alias(target, one_field);
                    }
                }
            }

            // A composite many-to-one field has no column of its own.
            if !relation.fields.contains(&relation.field) {
                if let Some(owner) = schema.collections.get_mut(&relation.collection) {
                    add_alias(owner, &relation.field);
                }
            }

            schema.relations.push(relation);
        }

        schema.verify()?;
        Ok(schema)
    }
}

impl CollectionBuilder {
    /// Adds a field and appends it to the primary key.
    pub fn primary(mut self, name: &str, ty: FieldType) -> Self {
        self.collection.primary.push(name.to_string());
        self.push(name, ty, false)
    }

    pub fn field(self, name: &str, ty: FieldType) -> Self {
        self.push(name, ty, false)
    }

    pub fn nullable(self, name: &str, ty: FieldType) -> Self {
        self.push(name, ty, true)
    }

    pub fn alias(self, name: &str) -> Self {
        self.push(name, FieldType::Alias, true)
    }

    fn push(mut self, name: &str, ty: FieldType, nullable: bool) -> Self {
        self.collection.fields.insert(
            name.to_string(),
            Field {
                name: name.to_string(),
                ty,
                nullable,
            },
        );
        self
    }
}

fn add_alias(collection: &mut Collection, name: &str) {
    if !collection.fields.contains_key(name) {
        collection.fields.insert(
            name.to_string(),
            Field {
                name: name.to_string(),
                ty: FieldType::Alias,
                nullable: true,
            },
        );
    }
}
