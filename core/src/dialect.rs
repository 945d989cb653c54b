//! Pluggable command-builder dialects.
//!
//! [`SqlDialect`] carries the dialect-specific pieces of command text; the
//! compiler asks it how to delimit identifiers, how to write a placeholder and
//! whether a fetch limit can be expressed. [`AnsiDialect`] is the baseline.

use compact_str::CompactString;
use core::fmt::Write;

use crate::error::{Result, TesseraError};
use crate::params::{Placeholder, PlaceholderStyle};

/// Re-export the unified Dialect enum from tessera-types
pub use tessera_types::Dialect;

/// Dialect-specific command text.
///
/// Default methods implement the baseline (ANSI) behavior; variants override
/// what differs.
pub trait SqlDialect {
    /// Which built-in dialect this is closest to (used for logging and config round-trips).
    fn kind(&self) -> Dialect;

    /// Placeholder syntax for bound parameters.
    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::AtSign
    }

    /// Delimits an identifier, doubling any embedded quote characters.
    fn quote_identifier(&self, ident: &str) -> CompactString {
        let mut quoted = CompactString::with_capacity(ident.len() + 2);
        quoted.push('"');
        for ch in ident.chars() {
            if ch == '"' {
                quoted.push('"');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    }

    /// Writes a placeholder for the parameter bound under `name` at 1-based `position`.
    fn write_placeholder(&self, buf: &mut String, name: &str, position: usize) {
        let _ = write!(
            buf,
            "{}",
            Placeholder::new(name, position, self.placeholder_style())
        );
    }

    /// Appends a fetch limit to a SELECT.
    ///
    /// The baseline has no portable limit syntax and rejects it.
    fn write_limit(&self, _buf: &mut String, limit: u32) -> Result<()> {
        Err(TesseraError::UnsupportedFeature(format!(
            "fetch limit ({limit}) is not supported by the {} dialect",
            self.kind()
        )))
    }
}

/// Baseline builder: `@name` placeholders, double-quoted identifiers, no fetch limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl SqlDialect for AnsiDialect {
    fn kind(&self) -> Dialect {
        Dialect::Ansi
    }
}

/// SQLite: `:name` placeholders, `LIMIT n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn kind(&self) -> Dialect {
        Dialect::SQLite
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Colon
    }

    fn write_limit(&self, buf: &mut String, limit: u32) -> Result<()> {
        let _ = write!(buf, " LIMIT {limit}");
        Ok(())
    }
}

/// PostgreSQL: `$n` numbered placeholders, `LIMIT n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn kind(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Numbered
    }

    fn write_limit(&self, buf: &mut String, limit: u32) -> Result<()> {
        let _ = write!(buf, " LIMIT {limit}");
        Ok(())
    }
}

static ANSI: AnsiDialect = AnsiDialect;
static SQLITE: SqliteDialect = SqliteDialect;
static POSTGRES: PostgresDialect = PostgresDialect;

/// Extension trait mapping the [`Dialect`] enum onto its built-in builder
pub trait DialectExt {
    fn builder(&self) -> &'static dyn SqlDialect;
}

impl DialectExt for Dialect {
    #[inline]
    fn builder(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Ansi => &ANSI,
            Dialect::SQLite => &SQLITE,
            Dialect::PostgreSQL => &POSTGRES,
        }
    }
}
