//! Unified SQL dialect enum
//!
//! Single source of truth for dialect identification. The compiler crate maps
//! each variant onto a concrete command-builder implementation.

/// SQL dialect for database-specific command text
///
/// Each dialect has different placeholder syntax and a different answer to
/// whether a fetch limit can be expressed natively.
///
/// # Examples
///
/// ```
/// use tessera_types::Dialect;
///
/// let dialect = Dialect::PostgreSQL;
/// assert!(dialect.uses_numbered_placeholders());
/// assert!(dialect.supports_limit());
///
/// assert!(!Dialect::Ansi.supports_limit());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// Baseline ANSI builder - uses `@name` placeholders, no fetch limit
    #[default]
    Ansi,

    /// SQLite - uses `:name` placeholders, `LIMIT n`
    SQLite,

    /// PostgreSQL - uses `$1, $2, ...` numbered placeholders, `LIMIT n`
    #[cfg_attr(feature = "serde", serde(alias = "postgres", alias = "pg"))]
    PostgreSQL,
}

impl Dialect {
    /// Returns `true` if this dialect renders parameters by position (`$1, $2, ...`)
    /// rather than by bound name.
    #[inline]
    #[must_use]
    pub const fn uses_numbered_placeholders(&self) -> bool {
        matches!(self, Dialect::PostgreSQL)
    }

    /// Returns `true` if this dialect has native syntax for a fetch limit.
    #[inline]
    #[must_use]
    pub const fn supports_limit(&self) -> bool {
        !matches!(self, Dialect::Ansi)
    }

    /// Parse a dialect from a string (case-insensitive)
    ///
    /// Supports common aliases:
    /// - ANSI: `"ansi"`, `"baseline"`
    /// - SQLite: `"sqlite"`
    /// - PostgreSQL: `"postgresql"`, `"postgres"`, `"pg"`
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_types::Dialect;
    ///
    /// assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SQLite));
    /// assert_eq!(Dialect::parse("pg"), Some(Dialect::PostgreSQL));
    /// assert_eq!(Dialect::parse("unknown"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("ansi") || s.eq_ignore_ascii_case("baseline") {
            Some(Dialect::Ansi)
        } else if s.eq_ignore_ascii_case("sqlite") {
            Some(Dialect::SQLite)
        } else if s.eq_ignore_ascii_case("postgresql")
            || s.eq_ignore_ascii_case("postgres")
            || s.eq_ignore_ascii_case("pg")
        {
            Some(Dialect::PostgreSQL)
        } else {
            None
        }
    }

    /// Get the dialect name as a lowercase string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::Ansi => "ansi",
            Dialect::SQLite => "sqlite",
            Dialect::PostgreSQL => "postgresql",
        }
    }
}

impl core::fmt::Display for Dialect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown dialect name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectParseError(pub compact_str::CompactString);

impl core::fmt::Display for DialectParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "unknown dialect '{}', expected one of: ansi, sqlite, postgresql",
            self.0
        )
    }
}

impl std::error::Error for DialectParseError {}

impl core::str::FromStr for Dialect {
    type Err = DialectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DialectParseError(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parse() {
        assert_eq!(Dialect::parse("ansi"), Some(Dialect::Ansi));
        assert_eq!(Dialect::parse("Baseline"), Some(Dialect::Ansi));

        assert_eq!(Dialect::parse("sqlite"), Some(Dialect::SQLite));
        assert_eq!(Dialect::parse("SQLite"), Some(Dialect::SQLite));

        assert_eq!(Dialect::parse("postgresql"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("postgres"), Some(Dialect::PostgreSQL));
        assert_eq!(Dialect::parse("PG"), Some(Dialect::PostgreSQL));

        assert_eq!(Dialect::parse("mysql"), None);
        assert_eq!(Dialect::parse(""), None);
    }

    #[test]
    fn test_dialect_from_str_error() {
        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown dialect 'oracle', expected one of: ansi, sqlite, postgresql"
        );
    }

    #[test]
    fn test_dialect_capabilities() {
        assert!(!Dialect::Ansi.supports_limit());
        assert!(Dialect::SQLite.supports_limit());
        assert!(Dialect::PostgreSQL.supports_limit());

        assert!(!Dialect::SQLite.uses_numbered_placeholders());
        assert!(Dialect::PostgreSQL.uses_numbered_placeholders());
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(format!("{}", Dialect::Ansi), "ansi");
        assert_eq!(format!("{}", Dialect::SQLite), "sqlite");
        assert_eq!(format!("{}", Dialect::PostgreSQL), "postgresql");
    }
}
