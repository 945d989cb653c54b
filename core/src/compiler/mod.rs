//! Qualifier and fetch-specification compilation into parameterized command text.
//!
//! A [`SqlCompiler`] accumulates text and bound parameters for exactly one
//! statement. Every `compile_*` method consumes the compiler, so a compiler
//! that failed half-way can never be inspected or reused.

mod qualifier;
mod write;

use compact_str::{CompactString, format_compact};
use hashbrown::{HashMap, HashSet};
use tessera_types::{SortDirection, Value};

use crate::config::CompilerConfig;
use crate::dialect::{DialectExt, SqlDialect};
use crate::error::Result;
use crate::fetch::FetchSpecification;
use crate::metadata::{ColumnMetadata, EntityMetadata, Model};
use crate::params::{BoundParam, CompiledCommand};
use crate::{tessera_profile_scope, tessera_trace_command};

/// Scope a qualifier is compiled against.
///
/// Path hops compile their remainder against a fresh context for the target
/// entity, while text and parameters keep accumulating in the shared compiler.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompileContext<'m> {
    pub(crate) table: &'m str,
    pub(crate) metadata: &'m EntityMetadata,
}

impl<'m> CompileContext<'m> {
    pub(crate) fn new(metadata: &'m EntityMetadata) -> Self {
        Self {
            table: metadata.table_name(),
            metadata,
        }
    }
}

/// Builds one command: SELECT, COUNT, INSERT, UPDATE or DELETE.
pub struct SqlCompiler<'m> {
    model: &'m Model,
    dialect: &'m dyn SqlDialect,
    quote_identifiers: bool,
    buf: String,
    params: Vec<BoundParam>,
    /// Running count behind bound names; shared by every nesting level.
    param_count: usize,
    bound_names: HashSet<CompactString>,
    /// Delimited form of each identifier written so far.
    quoted: HashMap<CompactString, CompactString>,
}

impl<'m> SqlCompiler<'m> {
    /// Creates a compiler for `model` using `dialect`, with identifier quoting enabled.
    pub fn new(model: &'m Model, dialect: &'m dyn SqlDialect) -> Self {
        Self {
            model,
            dialect,
            quote_identifiers: true,
            buf: String::with_capacity(256),
            params: Vec::new(),
            param_count: 0,
            bound_names: HashSet::new(),
            quoted: HashMap::new(),
        }
    }

    /// Creates a compiler from a [`CompilerConfig`].
    pub fn from_config(model: &'m Model, config: &CompilerConfig) -> Self {
        Self::new(model, config.dialect.builder()).quote_identifiers(config.quote_identifiers)
    }

    /// Toggles identifier delimiting for this compiler.
    #[must_use]
    pub fn quote_identifiers(mut self, enabled: bool) -> Self {
        self.quote_identifiers = enabled;
        self
    }

    // ==================== statements ====================

    /// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n]`
    pub fn compile_select(mut self, spec: &FetchSpecification) -> Result<CompiledCommand> {
        tessera_profile_scope!("compile", "select");
        let model = self.model;
        let entity = model.entity(spec.entity())?;

        self.buf.push_str("SELECT ");
        for (idx, column) in entity.columns().iter().enumerate() {
            if idx > 0 {
                self.buf.push_str(", ");
            }
            self.write_identifier(column.name());
        }
        self.write_from_where(entity, spec)?;

        if !spec.sort_orderings().is_empty() {
            self.buf.push_str(" ORDER BY ");
            for (idx, ordering) in spec.sort_orderings().iter().enumerate() {
                if idx > 0 {
                    self.buf.push_str(", ");
                }
                let column = entity.column_for(&ordering.property)?;
                self.write_identifier(column.name());
                if ordering.direction == SortDirection::Desc {
                    self.buf.push_str(" DESC");
                }
            }
        }

        if let Some(limit) = spec.fetch_limit() {
            self.dialect.write_limit(&mut self.buf, limit)?;
        }

        Ok(self.finish("select"))
    }

    /// `SELECT COUNT(*) FROM <table> [WHERE ...]`; sort orderings and limit are ignored.
    pub fn compile_count(mut self, spec: &FetchSpecification) -> Result<CompiledCommand> {
        tessera_profile_scope!("compile", "count");
        let model = self.model;
        let entity = model.entity(spec.entity())?;
        self.buf.push_str("SELECT COUNT(*)");
        self.write_from_where(entity, spec)?;
        Ok(self.finish("count"))
    }

    fn write_from_where(
        &mut self,
        entity: &'m EntityMetadata,
        spec: &FetchSpecification,
    ) -> Result<()> {
        self.buf.push_str(" FROM ");
        self.write_identifier(entity.table_name());
        if let Some(qualifier) = spec.qualifier() {
            self.buf.push_str(" WHERE ");
            self.write_qualifier(CompileContext::new(entity), qualifier)?;
        }
        Ok(())
    }

    // ==================== shared output ====================

    /// Writes an identifier, delimiting it when quoting is enabled.
    ///
    /// The delimited form is computed once per identifier and reused.
    pub(crate) fn write_identifier(&mut self, ident: &str) {
        if !self.quote_identifiers {
            self.buf.push_str(ident);
            return;
        }
        if let Some(quoted) = self.quoted.get(ident) {
            self.buf.push_str(quoted);
            return;
        }
        let quoted = self.dialect.quote_identifier(ident);
        self.buf.push_str(&quoted);
        self.quoted.insert(CompactString::from(ident), quoted);
    }

    /// Binds `value` for `column` under a fresh name and writes its placeholder.
    ///
    /// Returns the 1-based bind position, usable with [`write_param_ref`](Self::write_param_ref).
    pub(crate) fn bind(&mut self, column: &ColumnMetadata, value: Value) -> usize {
        let name = loop {
            self.param_count += 1;
            let candidate = format_compact!("{}{}", column.name(), self.param_count);
            // "Id" + 11 and "Id1" + 1 spell the same name; skip ahead until unique.
            if self.bound_names.insert(candidate.clone()) {
                break candidate;
            }
        };
        self.params.push(BoundParam::new(column.clone(), name, value));
        let position = self.params.len();
        self.write_param_ref(position);
        position
    }

    /// Writes the placeholder of an already bound parameter again.
    pub(crate) fn write_param_ref(&mut self, position: usize) {
        let name = &self.params[position - 1].name;
        self.dialect.write_placeholder(&mut self.buf, name, position);
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn finish(self, kind: &'static str) -> CompiledCommand {
        tessera_trace_command!(kind, &self.buf, self.params.len());
        CompiledCommand::new(self.buf, self.params)
    }
}
