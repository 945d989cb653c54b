//! TOML configuration for the compiler and for entity mappings.
//!
//! Two documents are understood:
//!
//! - a compiler config (`dialect`, `quote_identifiers`), see [`CompilerConfig`]
//! - a mapping file with `[[entity]]` and `[[relation]]` tables, see [`MappingConfig`]

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_types::Dialect;

use crate::error::Result;
use crate::metadata::{ColumnMetadata, EntityMetadata, Model, RelationDescriptor};

// ============================================================================
// Compiler configuration
// ============================================================================

/// Settings a [`SqlCompiler`](crate::SqlCompiler) is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default)]
    pub dialect: Dialect,

    #[serde(default = "yes")]
    pub quote_identifiers: bool,
}

fn yes() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Ansi,
            quote_identifiers: true,
        }
    }
}

impl CompilerConfig {
    /// Parses a compiler config from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a compiler config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

// ============================================================================
// Mapping configuration
// ============================================================================

/// A mapping file: entities with their columns, and the relations between them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingConfig {
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityConfig>,

    #[serde(default, rename = "relation")]
    pub relations: Vec<RelationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityConfig {
    pub name: CompactString,
    /// Defaults to the entity name.
    #[serde(default)]
    pub table: Option<CompactString>,
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    pub name: CompactString,
    #[serde(default)]
    pub property: Option<CompactString>,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub generated: bool,
    /// Optimistic-lock strategy text (`equals`, `like`, `none`). Checked at compile time.
    #[serde(default)]
    pub lock: Option<CompactString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationConfig {
    pub name: CompactString,
    pub parent: CompactString,
    pub child: CompactString,
    pub parent_key: KeyColumns,
    pub child_key: KeyColumns,
    /// Name of the to-one relation registered on the child entity.
    #[serde(default)]
    pub inverse: Option<CompactString>,
}

/// Key column(s); a single name or a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeyColumns {
    One(CompactString),
    Many(Vec<CompactString>),
}

impl KeyColumns {
    pub fn as_slice(&self) -> &[CompactString] {
        match self {
            Self::One(s) => std::slice::from_ref(s),
            Self::Many(v) => v,
        }
    }
}

impl MappingConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Builds and validates a [`Model`].
    ///
    /// Relations are registered on the parent entity; an `inverse` name also
    /// registers the same association on the child.
    pub fn into_model(self) -> Result<Model> {
        let mut model = Model::new();
        for entity in self.entities {
            let table = entity.table.unwrap_or_else(|| entity.name.clone());
            let mut metadata = EntityMetadata::new(entity.name, table);
            for column in entity.columns {
                let mut meta = ColumnMetadata::new(column.name);
                if let Some(property) = column.property {
                    meta = meta.property(property);
                }
                if column.primary_key {
                    meta = meta.primary_key();
                }
                if column.generated {
                    meta = meta.generated();
                }
                if let Some(lock) = column.lock {
                    meta = meta.lock(lock);
                }
                metadata = metadata.column(meta);
            }
            model.insert(metadata);
        }

        for relation in self.relations {
            let descriptor = RelationDescriptor::new(
                relation.name,
                relation.parent,
                relation.parent_key.as_slice(),
                relation.child,
                relation.child_key.as_slice(),
            )?;
            if let Some(inverse) = relation.inverse {
                model
                    .entity_mut(descriptor.child())?
                    .push_relation(descriptor.renamed(inverse));
            }
            let parent = CompactString::from(descriptor.parent());
            model.entity_mut(&parent)?.push_relation(descriptor);
        }

        model.validate()?;
        Ok(model)
    }
}
