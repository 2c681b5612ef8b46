use super::fields::Converter;
use super::reference::{FOREIGN_COLLECTION, FOREIGN_KEY, VALUE};
use crate::mapping::{A2oMapping, AliasMapping};
use crate::query::UnionOneNesting;
use crate::stmt::{Expr, Join, Operand, TableIndex};
use crate::{Error, Result};

impl Converter<'_> {
    /// Joins every candidate collection against the discriminator column.
    ///
    /// For each candidate, in declaration order, the join condition is
    ///
    /// ```text
    /// json(disc, "foreignCollection") = <collection>
    ///   AND json(disc, "foreignKey", i, "value") = candidate.<identifier i>
    /// ```
    ///
    /// with parameters bound in that order. A row matches at most one
    /// candidate; the other joins produce nulls.
    pub(super) fn nested_union_one(
        &mut self,
        alias: &str,
        nesting: &UnionOneNesting,
        table: TableIndex,
    ) -> Result<AliasMapping> {
        let discriminator = self.column_for(table, &nesting.field);
        let mut collections = Vec::with_capacity(nesting.collections.len());

        for candidate in &nesting.collections {
            if candidate.identifier_fields.is_empty() {
                return Err(Error::schema_mismatch(format!(
                    "`{alias}` candidate `{}` has no identifier fields",
                    candidate.collection
                )));
            }

            let foreign = self.gen.table();

            let collection_key = self.param(FOREIGN_COLLECTION);
            let collection_name = self.param(candidate.collection.as_str());
            let mut on = Expr::eq(
                Operand::json(table, nesting.field.clone(), vec![collection_key]),
                collection_name,
            );

            for (position, identifier) in candidate.identifier_fields.iter().enumerate() {
                let path = vec![
                    self.param(FOREIGN_KEY),
                    self.param(position as u64),
                    self.param(VALUE),
                ];
                on = Expr::and(
                    on,
                    Expr::eq(
                        Operand::json(table, nesting.field.clone(), path),
                        Operand::column(foreign, identifier.clone()),
                    ),
                );
            }

            self.joins.push(Join {
                collection: candidate.collection.clone(),
                table: foreign,
                on,
            });

            let mapping = self.convert_nodes(&candidate.fields, foreign)?;

            let identifiers = candidate
                .identifier_fields
                .iter()
                .map(|field| self.column_for(foreign, field))
                .collect();

            collections.push(A2oMapping {
                collection: candidate.collection.clone(),
                identifiers,
                mapping,
            });
        }

        Ok(AliasMapping::NestedA2o {
            alias: alias.to_string(),
            discriminator,
            collections,
        })
    }
}
