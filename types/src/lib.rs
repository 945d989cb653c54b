//! Shared type definitions for Tessera
//!
//! This crate provides the leaf types used across the Tessera crates:
//!
//! - [`Value`] - Typed scalar or null marker carried by predicates, rows and bound parameters
//! - [`Dialect`] - SQL dialect selector (ANSI baseline, SQLite, PostgreSQL)
//! - [`LockStrategy`] - Optimistic-lock matching strategy for a column
//! - [`SortDirection`] - Direction of a sort ordering
//! - [`RowVersion`] - Which version of a cached row to read
//!
//! # Features
//!
//! - `std` - Standard library support (enabled by default)
//! - `serde` - Enable serde serialization/deserialization

mod dialect;
mod lock;
mod order;
mod value;

pub use dialect::{Dialect, DialectParseError};
pub use lock::LockStrategy;
pub use order::{RowVersion, SortDirection};
pub use value::Value;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{Dialect, LockStrategy, RowVersion, SortDirection, Value};
}
