use tessera_types::{RowVersion, Value};

use super::SqlCompiler;
use crate::error::{Result, TesseraError};
use crate::metadata::{ColumnMetadata, EntityMetadata};
use crate::params::CompiledCommand;
use crate::row::RowAccess;
use crate::tessera_profile_scope;

impl<'m> SqlCompiler<'m> {
    /// `INSERT INTO <table> (<columns>) VALUES (<params>)`
    ///
    /// One parameter per listed column, bound to the row's current value. An
    /// empty column list produces `DEFAULT VALUES`.
    pub fn compile_insert<R, I, S>(mut self, row: &R, columns: I) -> Result<CompiledCommand>
    where
        R: RowAccess + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tessera_profile_scope!("compile", "insert");
        let model = self.model;
        let entity = model.entity(row.entity())?;
        let columns = columns
            .into_iter()
            .map(|c| entity.column_named(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        self.buf.push_str("INSERT INTO ");
        self.write_identifier(entity.table_name());

        if columns.is_empty() {
            self.buf.push_str(" DEFAULT VALUES");
            return Ok(self.finish("insert"));
        }

        self.buf.push_str(" (");
        for (idx, column) in columns.iter().enumerate() {
            if idx > 0 {
                self.buf.push_str(", ");
            }
            self.write_identifier(column.name());
        }
        self.buf.push_str(") VALUES (");
        for (idx, column) in columns.iter().enumerate() {
            if idx > 0 {
                self.buf.push_str(", ");
            }
            let value = row_value(entity, row, column, RowVersion::Current)?;
            self.bind(column, value);
        }
        self.buf.push(')');

        Ok(self.finish("insert"))
    }

    /// `UPDATE <table> SET <col = param, ...> WHERE <optimistic lock match>`
    ///
    /// Every column except generated ones is written from the row's current values.
    ///
    /// # Errors
    ///
    /// [`TesseraError::Configuration`] when the entity has no writable column, or
    /// when no column takes part in lock matching (every strategy is `NONE`):
    /// an unguarded statement would touch every row of the table.
    pub fn compile_update<R>(mut self, row: &R) -> Result<CompiledCommand>
    where
        R: RowAccess + ?Sized,
    {
        tessera_profile_scope!("compile", "update");
        let model = self.model;
        let entity = model.entity(row.entity())?;

        self.buf.push_str("UPDATE ");
        self.write_identifier(entity.table_name());
        self.buf.push_str(" SET ");
        let mut first = true;
        for column in entity.columns().iter().filter(|c| !c.is_generated()) {
            if !first {
                self.buf.push_str(", ");
            }
            first = false;
            let value = row_value(entity, row, column, RowVersion::Current)?;
            self.write_identifier(column.name());
            self.buf.push_str(" = ");
            self.bind(column, value);
        }
        if first {
            return Err(TesseraError::Configuration(format!(
                "entity '{}' has no writable columns",
                entity.name()
            )));
        }

        self.write_lock_match(entity, row)?;
        Ok(self.finish("update"))
    }

    /// `DELETE FROM <table> WHERE <optimistic lock match>`
    ///
    /// # Errors
    ///
    /// [`TesseraError::Configuration`] when no column takes part in lock
    /// matching, as for [`compile_update`](Self::compile_update).
    pub fn compile_delete<R>(mut self, row: &R) -> Result<CompiledCommand>
    where
        R: RowAccess + ?Sized,
    {
        tessera_profile_scope!("compile", "delete");
        let model = self.model;
        let entity = model.entity(row.entity())?;

        self.buf.push_str("DELETE FROM ");
        self.write_identifier(entity.table_name());
        self.write_lock_match(entity, row)?;
        Ok(self.finish("delete"))
    }

    /// ` WHERE ((col = p) OR (COALESCE(col, p) IS NULL)) AND ...`
    ///
    /// `p` is bound once, to the row's original value, and referenced twice so
    /// that two nulls match.
    fn write_lock_match<R>(&mut self, entity: &'m EntityMetadata, row: &R) -> Result<()>
    where
        R: RowAccess + ?Sized,
    {
        let mut matched = 0usize;
        for column in entity.columns() {
            let Some(operator) = column.lock_strategy()?.operator() else {
                continue;
            };
            self.buf
                .push_str(if matched == 0 { " WHERE " } else { " AND " });
            matched += 1;

            let original = row_value(entity, row, column, RowVersion::Original)?;
            self.buf.push_str("((");
            self.write_identifier(column.name());
            self.buf.push(' ');
            self.buf.push_str(operator);
            self.buf.push(' ');
            let position = self.bind(column, original);
            self.buf.push_str(") OR (COALESCE(");
            self.write_identifier(column.name());
            self.buf.push_str(", ");
            self.write_param_ref(position);
            self.buf.push_str(") IS NULL))");
        }

        if matched == 0 {
            return Err(TesseraError::Configuration(format!(
                "entity '{}' has no columns participating in optimistic lock matching",
                entity.name()
            )));
        }
        Ok(())
    }
}

fn row_value<R>(
    entity: &EntityMetadata,
    row: &R,
    column: &ColumnMetadata,
    version: RowVersion,
) -> Result<Value>
where
    R: RowAccess + ?Sized,
{
    row.value(column.name(), version).ok_or_else(|| {
        TesseraError::Mapping(format!(
            "row of entity '{}' has no value for column '{}'",
            entity.name(),
            column.name()
        ))
    })
}
