//! Turns a client [`Request`] into an [`AbstractQuery`] using the schema.
//!
//! Planning resolves each requested field path to a field node: primitive
//! columns, JSON reads, or one of the nested node kinds depending on the
//! relation the path crosses. Fields the caller may not read are dropped.

mod deep;
use deep::Deep;

mod fields;
use fields::Requested;

mod permissions;
pub use permissions::{AllowedFields, Permissions};

mod request;
pub use request::Request;

use crate::query::{
    FieldNode, Limit, Modifiers, Nesting, Sort, UnionCollection, UnionManyCollection,
    UnionManyNesting, UnionOneNesting,
};
use crate::schema::{Collection, Relation, RelationType};
use crate::{filter, AbstractQuery, Config, Error, Result, Schema};

use indexmap::IndexMap;

/// Plans `request` against `schema` for a caller holding `permissions`.
pub fn plan(
    schema: &Schema,
    permissions: &Permissions,
    config: &Config,
    request: &Request,
) -> Result<AbstractQuery> {
    let collection = schema.require_collection(&request.collection)?;

    if !permissions.allows_collection(&collection.name) {
        return Err(Error::invalid_query(format!(
            "collection `{}` is not readable",
            collection.name
        )));
    }

    let planner = Planner {
        schema,
        permissions,
        config,
    };

    let deep = Deep::new(request.deep.as_ref())?;
    let fields = planner.nodes(collection, &request.fields, &request.alias, deep, 0)?;

    let limit = match request.limit {
        Some(limit) => Limit::from_i64(limit)
            .ok_or_else(|| Error::invalid_query(format!("invalid limit {limit}")))?,
        None => config.default_limit,
    };

    let modifiers = Modifiers {
        filter: planner.filter(collection, request.filter.as_ref())?,
        sort: request.sort.iter().map(|sort| Sort::parse(sort)).collect(),
        limit: Some(limit),
        offset: request.offset,
        page: request.page,
    };

    tracing::debug!(
        collection = %collection.name,
        fields = fields.len(),
        "nestql.plan"
    );

    Ok(AbstractQuery {
        collection: collection.name.clone(),
        fields,
        modifiers,
    })
}

struct Planner<'a> {
    schema: &'a Schema,
    permissions: &'a Permissions,
    config: &'a Config,
}

impl Planner<'_> {
    fn nodes(
        &self,
        collection: &Collection,
        paths: &[String],
        alias: &IndexMap<String, String>,
        deep: Deep<'_>,
        depth: usize,
    ) -> Result<Vec<FieldNode>> {
        let mut nodes = vec![];

        for (key, requested) in fields::group(paths, alias, collection)? {
            if !self.permissions.allows_field(&collection.name, &requested.field) {
                tracing::debug!(
                    collection = %collection.name,
                    field = %requested.field,
                    "nestql.plan.forbidden_field"
                );
                continue;
            }

            if requested.is_nested() && depth + 1 > self.config.max_relational_depth {
                return Err(Error::invalid_query(format!(
                    "`{key}` on `{}` nests deeper than the maximum relational depth of {}",
                    collection.name, self.config.max_relational_depth
                )));
            }

            if let Some(node) = self.node(collection, key, &requested, deep, depth)? {
                nodes.push(node);
            }
        }

        Ok(nodes)
    }

    fn node(
        &self,
        collection: &Collection,
        alias: String,
        requested: &Requested,
        deep: Deep<'_>,
        depth: usize,
    ) -> Result<Option<FieldNode>> {
        let field = &requested.field;

        if let Some(path) = &requested.json_path {
            self.require_field(collection, field)?;
            return Ok(Some(FieldNode::JsonPath {
                field: field.clone(),
                path: path.clone(),
                alias,
            }));
        }

        let Some(info) = self.schema.relation_info(&collection.name, field) else {
            if requested.is_nested() {
                return Err(Error::missing_relation(&collection.name, field));
            }
            self.require_field(collection, field)?;
            return Ok(Some(FieldNode::Primitive {
                field: field.clone(),
                alias,
            }));
        };

        let relation = info.relation;

        match info.ty {
            RelationType::M2o | RelationType::A2o if !requested.is_nested() => {
                // A composite key has no single column to read.
                let [column] = relation.fields.as_slice() else {
                    return Err(Error::invalid_query(format!(
                        "`{}.{}` spans the columns {}; request them by name or nest into it",
                        collection.name,
                        field,
                        relation
                            .fields
                            .iter()
                            .map(|column| format!("`{column}`"))
                            .collect::<Vec<_>>()
                            .join(", ")
                    )));
                };

                Ok(Some(FieldNode::Primitive {
                    field: column.clone(),
                    alias,
                }))
            }
            RelationType::M2o => {
                self.reject_scopes(collection, requested)?;

                let Some(target) = self.readable(info.target()) else {
                    return Ok(None);
                };

                let deep = deep.child(&[alias.as_str()])?;
                let fields = self.nodes(
                    target,
                    &requested.unscoped_paths(),
                    &deep.alias()?,
                    deep,
                    depth + 1,
                )?;

                Ok(Some(FieldNode::NestedOne {
                    alias,
                    fields,
                    nesting: Nesting {
                        local_fields: relation.fields.clone(),
                        foreign_collection: target.name.clone(),
                        foreign_fields: relation.related_fields.clone(),
                    },
                }))
            }
            RelationType::O2m => {
                self.reject_scopes(collection, requested)?;

                let Some(target) = self.readable(info.target()) else {
                    return Ok(None);
                };

                let deep = deep.child(&[alias.as_str()])?;
                let paths = match requested.unscoped_paths() {
                    paths if paths.is_empty() => target.primary.clone(),
                    paths => paths,
                };
                let fields = self.nodes(target, &paths, &deep.alias()?, deep, depth + 1)?;

                let mut modifiers = self.nested_modifiers(target, deep)?;
                if modifiers.sort.is_empty() {
                    modifiers.sort = default_sort(relation, target);
                }

                Ok(Some(FieldNode::NestedMany {
                    alias,
                    fields,
                    nesting: Nesting {
                        local_fields: relation.related_fields.clone(),
                        foreign_collection: target.name.clone(),
                        foreign_fields: relation.fields.clone(),
                    },
                    modifiers,
                }))
            }
            RelationType::A2o => {
                self.check_scopes(collection, requested, &relation.one_allowed_collections)?;

                let mut collections = vec![];

                for candidate in &relation.one_allowed_collections {
                    let Some(target) = self.readable(Some(candidate)) else {
                        continue;
                    };

                    let scoped = format!("{alias}:{candidate}");
                    let deep = deep.child(&[scoped.as_str(), alias.as_str()])?;
                    let fields = self.nodes(
                        target,
                        &requested.paths_for(candidate),
                        &deep.alias()?,
                        deep,
                        depth + 1,
                    )?;

                    collections.push(UnionCollection {
                        collection: target.name.clone(),
                        identifier_fields: target.primary.clone(),
                        fields,
                    });
                }

                if collections.is_empty() {
                    return Ok(None);
                }

                Ok(Some(FieldNode::NestedUnionOne {
                    alias,
                    nesting: UnionOneNesting {
                        field: relation.discriminator().to_string(),
                        collections,
                    },
                }))
            }
            RelationType::O2a => {
                let relations = self.schema.o2a_relations(&collection.name, field);
                let candidates: Vec<String> = relations
                    .iter()
                    .map(|relation| relation.collection.clone())
                    .collect();
                self.check_scopes(collection, requested, &candidates)?;

                let mut collections = vec![];

                for relation in relations {
                    let Some(target) = self.readable(Some(&relation.collection)) else {
                        continue;
                    };

                    let scoped = format!("{alias}:{}", target.name);
                    let deep = deep.child(&[scoped.as_str(), alias.as_str()])?;
                    let paths = match requested.paths_for(&target.name) {
                        paths if paths.is_empty() => target.primary.clone(),
                        paths => paths,
                    };
                    let fields = self.nodes(target, &paths, &deep.alias()?, deep, depth + 1)?;

                    collections.push(UnionManyCollection {
                        collection: target.name.clone(),
                        field: relation.discriminator().to_string(),
                        identifier_fields: collection.primary.clone(),
                        fields,
                        referenced_collection: Some(collection.name.clone()),
                    });
                }

                if collections.is_empty() {
                    return Ok(None);
                }

                let mut modifiers = deep.child(&[alias.as_str()])?.modifiers()?;
                for target in &collections {
                    let target = self.schema.require_collection(&target.collection)?;
                    self.filter(target, modifiers.filter.as_ref())?;
                }
                modifiers.limit.get_or_insert(self.config.default_limit);

                Ok(Some(FieldNode::NestedUnionMany {
                    alias,
                    nesting: UnionManyNesting {
                        identifier_fields: collection.primary.clone(),
                        collections,
                    },
                    modifiers,
                }))
            }
        }
    }

    /// A validated filter for `collection`.
    fn filter(
        &self,
        collection: &Collection,
        filter: Option<&serde_json::Value>,
    ) -> Result<Option<serde_json::Value>> {
        let Some(filter) = filter else {
            return Ok(None);
        };

        filter::deep_map_filter(filter, |entry, _| Some(entry), self.schema, &collection.name)
            .map(Some)
    }

    /// Modifiers from a `deep` level. Nested lists without a limit get the
    /// configured default.
    fn nested_modifiers(&self, target: &Collection, deep: Deep<'_>) -> Result<Modifiers> {
        let mut modifiers = deep.modifiers()?;
        modifiers.filter = self.filter(target, modifiers.filter.as_ref())?;
        modifiers.limit.get_or_insert(self.config.default_limit);
        Ok(modifiers)
    }

    /// The collection, if it exists and the caller may read it.
    fn readable(&self, collection: Option<&str>) -> Option<&Collection> {
        let collection = self.schema.collection(collection?)?;

        if !self.permissions.allows_collection(&collection.name) {
            tracing::debug!(collection = %collection.name, "nestql.plan.forbidden_collection");
            return None;
        }

        Some(collection)
    }

    fn require_field(&self, collection: &Collection, field: &str) -> Result<()> {
        if collection.field(field).is_none() {
            return Err(Error::invalid_query(format!(
                "unknown field `{field}` on collection `{}`",
                collection.name
            )));
        }
        Ok(())
    }

    fn reject_scopes(&self, collection: &Collection, requested: &Requested) -> Result<()> {
        self.check_scopes(collection, requested, &[])
    }

    fn check_scopes(
        &self,
        collection: &Collection,
        requested: &Requested,
        allowed: &[String],
    ) -> Result<()> {
        match requested
            .scopes()
            .find(|scope| !allowed.iter().any(|allowed| allowed == scope))
        {
            Some(scope) => Err(Error::invalid_query(format!(
                "`{}.{}` cannot be scoped to `{scope}`",
                collection.name, requested.field
            ))),
            None => Ok(()),
        }
    }
}

/// One-to-many items without an explicit sort follow the relation's sort
/// field, else the related primary key.
fn default_sort(relation: &Relation, target: &Collection) -> Vec<Sort> {
    relation
        .sort_field
        .as_ref()
        .or_else(|| target.primary.first())
        .map(|field| vec![Sort::asc(field.clone())])
        .unwrap_or_default()
}
