//! Object identities and the identity map seam.

use compact_str::CompactString;
use core::fmt;
use smallvec::SmallVec;
use tessera_types::Value;

/// Primary-key values of one row, in key-column order.
pub type KeyValues = SmallVec<[Value; 1]>;

/// Handle of a row inside a [`UnitOfWork`](crate::UnitOfWork).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub(crate) u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// `(table, primary key)`: the identity of one mapped object.
///
/// Equality and hashing are structural over the table name and key values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentity {
    table: CompactString,
    key: KeyValues,
}

impl ObjectIdentity {
    pub fn new<I, V>(table: impl Into<CompactString>, key: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            table: table.into(),
            key: key.into_iter().map(Into::into).collect(),
        }
    }

    /// Identity with a single-column key.
    pub fn single(table: impl Into<CompactString>, key: impl Into<Value>) -> Self {
        Self::new(table, [key.into()])
    }

    #[inline]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[inline]
    pub fn key(&self) -> &[Value] {
        &self.key
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.table)?;
        for value in &self.key {
            write!(f, ", {value}")?;
        }
        f.write_str("}")
    }
}

/// Resolves identities to live rows, or to rows deleted in the current unit of work.
pub trait IdentityMap {
    fn get(&self, identity: &ObjectIdentity) -> Option<RowId>;

    /// Looks up an identity that was removed from the live map by a delete.
    fn get_tombstoned(&self, identity: &ObjectIdentity) -> Option<RowId>;

    /// Live first, then tombstoned.
    fn resolve(&self, identity: &ObjectIdentity) -> Option<RowId> {
        self.get(identity).or_else(|| self.get_tombstoned(identity))
    }
}
