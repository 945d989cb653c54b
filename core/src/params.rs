use compact_str::CompactString;
use core::fmt;
use tessera_types::Value;

use crate::metadata::ColumnMetadata;

/// Various styles of SQL parameter placeholders.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderStyle {
    /// At-sign style placeholders (@param)
    #[default]
    AtSign,
    /// Colon style placeholders (:param)
    Colon,
    /// Numbered placeholders ($1, $2, ...) by bind position
    Numbered,
}

/// A SQL parameter placeholder as written into command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placeholder<'a> {
    /// The bound name of the parameter.
    pub name: &'a str,
    /// 1-based bind position.
    pub position: usize,
    /// The style of the placeholder.
    pub style: PlaceholderStyle,
}

impl<'a> Placeholder<'a> {
    pub const fn new(name: &'a str, position: usize, style: PlaceholderStyle) -> Self {
        Placeholder {
            name,
            position,
            style,
        }
    }
}

impl fmt::Display for Placeholder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            PlaceholderStyle::AtSign => write!(f, "@{}", self.name),
            PlaceholderStyle::Colon => write!(f, ":{}", self.name),
            PlaceholderStyle::Numbered => write!(f, "${}", self.position),
        }
    }
}

/// A bound parameter: the column it was generated for, its bound name and value.
///
/// This triple is what an external adapter turns into store-native parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub column: ColumnMetadata,
    pub name: CompactString,
    pub value: Value,
}

impl BoundParam {
    pub const fn new(column: ColumnMetadata, name: CompactString, value: Value) -> Self {
        Self {
            column,
            name,
            value,
        }
    }
}

/// Command text plus its ordered bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCommand {
    text: String,
    parameters: Vec<BoundParam>,
}

impl CompiledCommand {
    pub(crate) const fn new(text: String, parameters: Vec<BoundParam>) -> Self {
        Self { text, parameters }
    }

    #[inline]
    pub fn sql(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn params(&self) -> &[BoundParam] {
        &self.parameters
    }

    /// Looks up a parameter by bound name.
    pub fn param(&self, name: &str) -> Option<&BoundParam> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Bound names in bind order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }
}

impl fmt::Display for CompiledCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_styles() {
        assert_eq!(
            Placeholder::new("OrderId1", 1, PlaceholderStyle::AtSign).to_string(),
            "@OrderId1"
        );
        assert_eq!(
            Placeholder::new("OrderId1", 1, PlaceholderStyle::Colon).to_string(),
            ":OrderId1"
        );
        assert_eq!(
            Placeholder::new("OrderId1", 3, PlaceholderStyle::Numbered).to_string(),
            "$3"
        );
    }
}
