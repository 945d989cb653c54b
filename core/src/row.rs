//! Row access used by INSERT/UPDATE/DELETE compilation.

use compact_str::CompactString;
use hashbrown::HashMap;
use tessera_types::{RowVersion, Value};

/// Read access to one row's current and original values.
///
/// Implemented by the relational cache's row handles; [`RowImage`] is a
/// detached, in-memory implementation.
pub trait RowAccess {
    /// Name of the entity the row belongs to.
    fn entity(&self) -> &str;

    /// Value of `column` in the requested version, `None` if the row has no such column.
    ///
    /// Rows that were never persisted have no original version; implementations
    /// return the current value for [`RowVersion::Original`] in that case.
    fn value(&self, column: &str, version: RowVersion) -> Option<Value>;
}

/// A detached snapshot of a row's values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowImage {
    entity: CompactString,
    current: HashMap<CompactString, Value>,
    original: Option<HashMap<CompactString, Value>>,
}

impl RowImage {
    /// Creates a row with no original version (a new row).
    pub fn new(entity: impl Into<CompactString>) -> Self {
        Self {
            entity: entity.into(),
            current: HashMap::new(),
            original: None,
        }
    }

    /// Sets a current value.
    #[must_use]
    pub fn set(mut self, column: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        self.current.insert(column.into(), value.into());
        self
    }

    /// Sets an original value, creating the original version on first use.
    #[must_use]
    pub fn original(mut self, column: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        self.original
            .get_or_insert_with(HashMap::new)
            .insert(column.into(), value.into());
        self
    }
}

impl RowAccess for RowImage {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn value(&self, column: &str, version: RowVersion) -> Option<Value> {
        match (version, &self.original) {
            (RowVersion::Original, Some(original)) => original
                .get(column)
                .or_else(|| self.current.get(column))
                .cloned(),
            _ => self.current.get(column).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_falls_back_to_current() {
        let row = RowImage::new("Order").set("Id", 1).set("Note", "x");
        assert_eq!(row.value("Note", RowVersion::Original), Some(Value::from("x")));

        let row = row.original("Note", Value::Null);
        assert_eq!(row.value("Note", RowVersion::Original), Some(Value::Null));
        assert_eq!(row.value("Id", RowVersion::Original), Some(Value::Integer(1)));
        assert_eq!(row.value("Missing", RowVersion::Current), None);
    }
}
