//! Core of Tessera: entity metadata, qualifiers and the SQL compiler.
//!
//! A [`FetchSpecification`] (entity, [`Qualifier`], sort orderings, limit) or a
//! row implementing [`RowAccess`] is compiled by a [`SqlCompiler`] into a
//! [`CompiledCommand`]: command text plus named, ordered [`BoundParam`]s.

pub mod compiler;
pub mod config;
pub mod dialect;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod params;
pub mod predicate;
pub mod profiling;
pub mod qualifier;
pub mod row;
pub mod trace;

pub use compiler::SqlCompiler;
pub use config::{CompilerConfig, MappingConfig};
pub use dialect::{AnsiDialect, DialectExt, PostgresDialect, SqlDialect, SqliteDialect};
pub use error::{Result, TesseraError};
pub use fetch::{FetchSpecification, SortOrdering};
pub use metadata::{ColumnMetadata, EntityMetadata, Model, RelationDescriptor};
pub use params::{BoundParam, CompiledCommand, Placeholder, PlaceholderStyle};
pub use predicate::{Predicate, PredicateKind};
pub use qualifier::{Qualifier, RelationPath};
pub use row::{RowAccess, RowImage};
pub use tessera_types::{Dialect, LockStrategy, RowVersion, SortDirection, Value};
