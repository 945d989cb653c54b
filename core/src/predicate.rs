//! Predicates: a comparison kind plus a value.

use tessera_types::Value;

/// Comparison applied by a [`Predicate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    Equals,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Like,
    CaseInsensitiveEquals,
}

impl PredicateKind {
    /// All kinds, in declaration order.
    pub const ALL: [PredicateKind; 8] = [
        PredicateKind::Equals,
        PredicateKind::NotEqual,
        PredicateKind::LessThan,
        PredicateKind::LessOrEqual,
        PredicateKind::GreaterThan,
        PredicateKind::GreaterOrEqual,
        PredicateKind::Like,
        PredicateKind::CaseInsensitiveEquals,
    ];

    /// Operator text written between the column and its bound parameter.
    ///
    /// Case-insensitive equals carries its own padding and renders as
    /// `col  =  @p`; that exact text is part of the output contract.
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            PredicateKind::Equals => "=",
            PredicateKind::NotEqual => "<>",
            PredicateKind::LessThan => "<",
            PredicateKind::LessOrEqual => "<=",
            PredicateKind::GreaterThan => ">",
            PredicateKind::GreaterOrEqual => ">=",
            PredicateKind::Like => "LIKE",
            PredicateKind::CaseInsensitiveEquals => " = ",
        }
    }

    /// Null test used when the predicate value is the null marker.
    ///
    /// Only equality and inequality have a meaning against null.
    #[must_use]
    pub const fn null_test(self) -> Option<&'static str> {
        match self {
            PredicateKind::Equals => Some("IS NULL"),
            PredicateKind::NotEqual => Some("IS NOT NULL"),
            PredicateKind::LessThan
            | PredicateKind::LessOrEqual
            | PredicateKind::GreaterThan
            | PredicateKind::GreaterOrEqual
            | PredicateKind::Like
            | PredicateKind::CaseInsensitiveEquals => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PredicateKind::Equals => "Equals",
            PredicateKind::NotEqual => "NotEqual",
            PredicateKind::LessThan => "LessThan",
            PredicateKind::LessOrEqual => "LessOrEqual",
            PredicateKind::GreaterThan => "GreaterThan",
            PredicateKind::GreaterOrEqual => "GreaterOrEqual",
            PredicateKind::Like => "Like",
            PredicateKind::CaseInsensitiveEquals => "CaseInsensitiveEquals",
        }
    }
}

/// A comparison kind paired with a value. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    kind: PredicateKind,
    value: Value,
}

impl Predicate {
    pub fn new(kind: PredicateKind, value: impl Into<Value>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::Equals, value)
    }

    pub fn ne(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::NotEqual, value)
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::LessThan, value)
    }

    pub fn le(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::LessOrEqual, value)
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::GreaterThan, value)
    }

    pub fn ge(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::GreaterOrEqual, value)
    }

    pub fn like(pattern: impl Into<Value>) -> Self {
        Self::new(PredicateKind::Like, pattern)
    }

    /// Case-insensitive equality
    pub fn ieq(value: impl Into<Value>) -> Self {
        Self::new(PredicateKind::CaseInsensitiveEquals, value)
    }

    pub fn is_null() -> Self {
        Self::new(PredicateKind::Equals, Value::Null)
    }

    pub fn is_not_null() -> Self {
        Self::new(PredicateKind::NotEqual, Value::Null)
    }

    #[inline]
    pub const fn kind(&self) -> PredicateKind {
        self.kind
    }

    #[inline]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}
