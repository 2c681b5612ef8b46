use super::{Relation, Schema};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        self.verify_primary_keys()?;

        for relation in &self.schema.relations {
            self.verify_relation(relation)?;
        }

        Ok(())
    }

    fn verify_primary_keys(&self) -> Result<()> {
        for collection in self.schema.collections.values() {
            if collection.primary.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "collection `{}` has no primary key",
                    collection.name
                )));
            }

            for name in &collection.primary {
                if collection.field(name).is_none() {
                    return Err(Error::invalid_schema(format!(
                        "primary key field `{}.{}` does not exist",
                        collection.name, name
                    )));
                }
            }
        }

        Ok(())
    }

    fn verify_relation(&self, relation: &Relation) -> Result<()> {
        let Some(owner) = self.schema.collection(&relation.collection) else {
            return Err(Error::invalid_schema(format!(
                "relation `{}.{}` is declared on unknown collection",
                relation.collection, relation.field
            )));
        };

        if relation.fields.is_empty() {
            return Err(Error::invalid_schema(format!(
                "relation `{}.{}` has no key fields",
                relation.collection, relation.field
            )));
        }

        for name in &relation.fields {
            if owner.field(name).is_none() {
                return Err(Error::invalid_schema(format!(
                    "relation `{}.{}` uses missing field `{}`",
                    relation.collection, relation.field, name
                )));
            }
        }

        match &relation.related_collection {
            Some(related) => {
                let Some(target) = self.schema.collection(related) else {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` references unknown collection `{}`",
                        relation.collection, relation.field, related
                    )));
                };

                if relation.fields.len() != relation.related_fields.len() {
                    return Err(Error::invalid_schema(format!(
                        "relation `{}.{}` pairs {} fields with {} related fields",
                        relation.collection,
                        relation.field,
                        relation.fields.len(),
                        relation.related_fields.len()
                    )));
                }

                for name in &relation.related_fields {
                    if target.field(name).is_none() {
                        return Err(Error::invalid_schema(format!(
                            "relation `{}.{}` references missing field `{}.{}`",
                            relation.collection, relation.field, related, name
                        )));
                    }
                }
            }
            None => {
                if relation.one_allowed_collections.is_empty() {
                    return Err(Error::invalid_schema(format!(
                        "any-to-one relation `{}.{}` allows no collections",
                        relation.collection, relation.field
                    )));
                }

                for allowed in &relation.one_allowed_collections {
                    if self.schema.collection(allowed).is_none() {
                        return Err(Error::invalid_schema(format!(
                            "any-to-one relation `{}.{}` allows unknown collection `{}`",
                            relation.collection, relation.field, allowed
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
