//! Composable query expression trees.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::predicate::Predicate;

/// Relation names traversed by a [`Qualifier::Path`].
pub type RelationPath = SmallVec<[CompactString; 2]>;

/// A query expression tree.
///
/// Trees are built once and only read afterwards; compilation borrows them.
/// The order of children in `And`/`Or` is preserved in the compiled text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// Predicate applied to a physical column
    Column {
        column: CompactString,
        predicate: Predicate,
    },
    /// Predicate applied to a mapped property, resolved to its column at compile time
    Property {
        property: CompactString,
        predicate: Predicate,
    },
    /// Conjunction of children, in order
    And(Vec<Qualifier>),
    /// Disjunction of children, in order
    Or(Vec<Qualifier>),
    /// Traverses `relations` left to right, then applies `qualifier` to the final entity
    Path {
        relations: RelationPath,
        qualifier: Box<Qualifier>,
    },
}

impl Qualifier {
    pub fn column(column: impl Into<CompactString>, predicate: Predicate) -> Self {
        Qualifier::Column {
            column: column.into(),
            predicate,
        }
    }

    pub fn property(property: impl Into<CompactString>, predicate: Predicate) -> Self {
        Qualifier::Property {
            property: property.into(),
            predicate,
        }
    }

    pub fn and(children: impl IntoIterator<Item = Qualifier>) -> Self {
        Qualifier::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = Qualifier>) -> Self {
        Qualifier::Or(children.into_iter().collect())
    }

    /// Builds a path qualifier.
    ///
    /// ```
    /// use tessera_core::{Predicate, Qualifier};
    ///
    /// // customers with at least one order line for product 7
    /// let q = Qualifier::path(["orders", "lines"], Qualifier::property("product", Predicate::eq(7)));
    /// assert_eq!(q.depth(), 2);
    /// ```
    pub fn path<I, S>(relations: I, qualifier: Qualifier) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Qualifier::Path {
            relations: relations.into_iter().map(Into::into).collect(),
            qualifier: Box::new(qualifier),
        }
    }

    /// Maximum number of relation hops along any branch of the tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Qualifier::Column { .. } | Qualifier::Property { .. } => 0,
            Qualifier::And(children) | Qualifier::Or(children) => {
                children.iter().map(Qualifier::depth).max().unwrap_or(0)
            }
            Qualifier::Path {
                relations,
                qualifier,
            } => relations.len() + qualifier.depth(),
        }
    }
}
