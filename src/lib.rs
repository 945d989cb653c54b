//! # Tessera
//!
//! Qualifier-to-SQL compilation and incrementally maintained relation views.
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! # fn main() -> tessera::Result<()> {
//! let model = Model::new()
//!     .with(
//!         EntityMetadata::new("Order", "Orders")
//!             .column(ColumnMetadata::new("Id").primary_key().generated())
//!             .column(ColumnMetadata::new("Note").property("note")),
//!     );
//!
//! let spec = FetchSpecification::new("Order")
//!     .with_qualifier(Qualifier::property("note", Predicate::like("rush%")))
//!     .order_by(SortOrdering::desc("note"));
//!
//! let command = SqlCompiler::new(&model, &AnsiDialect).compile_select(&spec)?;
//! assert_eq!(
//!     command.sql(),
//!     r#"SELECT "Id", "Note" FROM "Orders" WHERE "Note" LIKE @Note1 ORDER BY "Note" DESC"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate           | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | `tessera-types` | `Value`, `Dialect`, `LockStrategy`, sort/version enums     |
//! | `tessera-core`  | metadata, qualifiers, `SqlCompiler`, TOML configuration   |
//! | `tessera-cache` | `UnitOfWork`, identity maps, `RelationView`, `RowSource`   |
//!
//! ## Features
//!
//! - `tracing` (default) - debug events for every compiled command and view change
//! - `profiling` - puffin scopes around compilation and cache mutation

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for tessera operations
pub use tessera_core::error::Result;

/// Database dialect enum
pub use tessera_types::Dialect;

/// Error types
pub mod error {
    pub use tessera_core::error::TesseraError;
}

/// Shared value types.
pub use tessera_types as types;

/// Metadata, qualifiers, the compiler and configuration.
pub mod core {
    pub use tessera_core::{
        AnsiDialect, BoundParam, ColumnMetadata, CompiledCommand, CompilerConfig, DialectExt,
        EntityMetadata, FetchSpecification, MappingConfig, Model, Placeholder, PlaceholderStyle,
        PostgresDialect, Predicate, PredicateKind, Qualifier, RelationDescriptor, RelationPath,
        RowAccess, RowImage, SortOrdering, SqlCompiler, SqlDialect, SqliteDialect,
    };

    /// Mapping file structures.
    pub use tessera_core::config;
}

/// The relational cache and relation views.
pub mod cache {
    pub use tessera_cache::*;
}

// =============================================================================
// Prelude
// =============================================================================

pub mod prelude {
    pub use crate::cache::{
        IdentityMap, ObjectIdentity, RelationView, RowId, RowSource, RowState, UnitOfWork,
    };
    pub use crate::core::*;
    pub use crate::error::TesseraError;
    pub use tessera_types::prelude::*;
}
