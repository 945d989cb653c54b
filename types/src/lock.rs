//! Optimistic-lock strategies

/// How a column participates in optimistic-lock matching during UPDATE/DELETE.
///
/// Mapping configuration stores the strategy as text so that it can come from
/// a mapping file; [`LockStrategy::parse`] is the single place that text is
/// interpreted. An unset strategy means [`LockStrategy::Equals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LockStrategy {
    /// Compare with `=`
    #[default]
    Equals,
    /// Compare with `LIKE`
    Like,
    /// Column does not participate in lock matching
    None,
}

impl LockStrategy {
    /// Parse a configured strategy (case-insensitive).
    ///
    /// ```
    /// use tessera_types::LockStrategy;
    ///
    /// assert_eq!(LockStrategy::parse("like"), Some(LockStrategy::Like));
    /// assert_eq!(LockStrategy::parse("NONE"), Some(LockStrategy::None));
    /// assert_eq!(LockStrategy::parse("fuzzy"), None);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("equals") || s.eq_ignore_ascii_case("eq") || s == "=" {
            Some(LockStrategy::Equals)
        } else if s.eq_ignore_ascii_case("like") {
            Some(LockStrategy::Like)
        } else if s.eq_ignore_ascii_case("none") {
            Some(LockStrategy::None)
        } else {
            None
        }
    }

    /// Comparison operator used in the lock clause, `None` when the column is skipped.
    #[must_use]
    pub const fn operator(&self) -> Option<&'static str> {
        match self {
            LockStrategy::Equals => Some("="),
            LockStrategy::Like => Some("LIKE"),
            LockStrategy::None => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LockStrategy::Equals => "equals",
            LockStrategy::Like => "like",
            LockStrategy::None => "none",
        }
    }
}

impl core::fmt::Display for LockStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
