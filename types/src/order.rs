/// Direction of a sort ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Which version of a cached row to read.
///
/// `Original` is the value last read from (or written to) the store;
/// `Current` includes pending, unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RowVersion {
    #[default]
    Current,
    Original,
}
