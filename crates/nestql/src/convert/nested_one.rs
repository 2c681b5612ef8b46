use super::{check_key_pairs, fields::Converter};
use crate::mapping::AliasMapping;
use crate::query::{FieldNode, Nesting};
use crate::stmt::{Expr, Join, Operand, TableIndex};
use crate::Result;

impl Converter<'_> {
    /// Joins the related collection and converts its fields against the
    /// joined table.
    pub(super) fn nested_one(
        &mut self,
        alias: &str,
        fields: &[FieldNode],
        nesting: &Nesting,
        table: TableIndex,
    ) -> Result<AliasMapping> {
        check_key_pairs(alias, &nesting.local_fields, &nesting.foreign_fields)?;

        let foreign = self.gen.table();

        let conditions = nesting
            .local_fields
            .iter()
            .zip(&nesting.foreign_fields)
            .map(|(local, foreign_field)| {
                Expr::eq(
                    Operand::column(table, local.clone()),
                    Operand::column(foreign, foreign_field.clone()),
                )
            })
            .collect();

        let Some(on) = Expr::and_from_vec(conditions) else {
            return Err(crate::Error::schema_mismatch(format!(
                "`{alias}` has no key fields"
            )));
        };

        self.joins.push(Join {
            collection: nesting.foreign_collection.clone(),
            table: foreign,
            on,
        });

        let children = self.convert_nodes(fields, foreign)?;

        let identifiers = nesting
            .foreign_fields
            .iter()
            .map(|field| self.column_for(foreign, field))
            .collect();

        Ok(AliasMapping::Nested {
            alias: alias.to_string(),
            identifiers,
            children,
        })
    }
}
