use compact_str::CompactString;

use super::{CompileContext, SqlCompiler};
use crate::error::{Result, TesseraError};
use crate::metadata::ColumnMetadata;
use crate::predicate::Predicate;
use crate::qualifier::Qualifier;

impl<'m> SqlCompiler<'m> {
    /// Writes `qualifier` as a WHERE fragment scoped to `ctx`.
    pub(crate) fn write_qualifier(
        &mut self,
        ctx: CompileContext<'m>,
        qualifier: &Qualifier,
    ) -> Result<()> {
        match qualifier {
            Qualifier::Column { column, predicate } => {
                let column = ctx.metadata.column_named(column)?;
                self.write_comparison(column, predicate)
            }
            Qualifier::Property {
                property,
                predicate,
            } => {
                let column = ctx.metadata.column_for(property)?;
                let resolved = Qualifier::column(column.name(), predicate.clone());
                self.write_qualifier(ctx, &resolved)
            }
            Qualifier::And(children) => self.write_junction(ctx, children, " AND ", "1=1"),
            Qualifier::Or(children) => self.write_junction(ctx, children, " OR ", "1=0"),
            Qualifier::Path {
                relations,
                qualifier,
            } => self.write_path(ctx, relations, qualifier),
        }
    }

    /// `<col> <op> <param>`, or `<col> IS [NOT] NULL` for a null value.
    fn write_comparison(&mut self, column: &ColumnMetadata, predicate: &Predicate) -> Result<()> {
        let kind = predicate.kind();
        if predicate.value().is_null() {
            let test = kind.null_test().ok_or_else(|| {
                TesseraError::UnsupportedFeature(format!(
                    "{} has no meaning against a null value (column '{}')",
                    kind.name(),
                    column.name()
                ))
            })?;
            self.write_identifier(column.name());
            self.buf.push(' ');
            self.buf.push_str(test);
            return Ok(());
        }

        self.write_identifier(column.name());
        self.buf.push(' ');
        self.buf.push_str(kind.operator());
        self.buf.push(' ');
        self.bind(column, predicate.value().clone());
        Ok(())
    }

    /// Children joined by `separator` inside parentheses, in insertion order.
    fn write_junction(
        &mut self,
        ctx: CompileContext<'m>,
        children: &[Qualifier],
        separator: &str,
        empty: &str,
    ) -> Result<()> {
        if children.is_empty() {
            self.buf.push_str(empty);
            return Ok(());
        }
        self.buf.push('(');
        for (idx, child) in children.iter().enumerate() {
            if idx > 0 {
                self.buf.push_str(separator);
            }
            self.write_qualifier(ctx, child)?;
        }
        self.buf.push(')');
        Ok(())
    }

    /// One `key IN (SELECT key FROM target WHERE ...)` per hop, nested left to right.
    fn write_path(
        &mut self,
        ctx: CompileContext<'m>,
        hops: &[CompactString],
        terminal: &Qualifier,
    ) -> Result<()> {
        let Some((hop, rest)) = hops.split_first() else {
            return self.write_qualifier(ctx, terminal);
        };

        let model = self.model;
        let relation = ctx.metadata.relation_for(hop)?;
        let (local_key, target, target_key) = if relation.parent() == ctx.metadata.name() {
            (
                relation.parent_key(),
                model.entity(relation.child())?,
                relation.child_key(),
            )
        } else {
            (
                relation.child_key(),
                model.entity(relation.parent())?,
                relation.parent_key(),
            )
        };
        let inner = CompileContext::new(target);

        self.write_identifier(local_key);
        self.buf.push_str(" IN (SELECT ");
        self.write_identifier(target_key);
        self.buf.push_str(" FROM ");
        self.write_identifier(inner.table);
        self.buf.push_str(" WHERE ");
        self.write_path(inner, rest, terminal)?;
        self.buf.push(')');
        Ok(())
    }
}
