//! Entity metadata: tables, columns, property resolution and relations.

use compact_str::CompactString;
use hashbrown::HashMap;
use tessera_types::LockStrategy;

use crate::error::{Result, TesseraError};

//------------------------------------------------------------------------------
// ColumnMetadata
//------------------------------------------------------------------------------

/// Describes one physical column and the property it is mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnMetadata {
    name: CompactString,
    property: CompactString,
    primary_key: bool,
    generated: bool,
    lock: Option<CompactString>,
}

impl ColumnMetadata {
    /// Creates a column whose property name equals its column name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        let name = name.into();
        Self {
            property: name.clone(),
            name,
            primary_key: false,
            generated: false,
            lock: None,
        }
    }

    #[must_use]
    pub fn property(mut self, property: impl Into<CompactString>) -> Self {
        self.property = property.into();
        self
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as auto-generated by the store (identity/serial).
    #[must_use]
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Sets the configured lock strategy text. Interpreted at compile time.
    #[must_use]
    pub fn lock(mut self, strategy: impl Into<CompactString>) -> Self {
        self.lock = Some(strategy.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn property_name(&self) -> &str {
        &self.property
    }

    #[inline]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    #[inline]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// Resolved lock strategy; unset means [`LockStrategy::Equals`].
    pub fn lock_strategy(&self) -> Result<LockStrategy> {
        match self.lock.as_deref() {
            None => Ok(LockStrategy::Equals),
            Some(text) => LockStrategy::parse(text).ok_or_else(|| {
                TesseraError::Configuration(format!(
                    "column '{}' has unrecognized lock strategy '{}'",
                    self.name, text
                ))
            }),
        }
    }
}

//------------------------------------------------------------------------------
// RelationDescriptor
//------------------------------------------------------------------------------

/// A one-to-many association between a parent and a child entity.
///
/// Keys are single columns; compound keys are rejected when the descriptor is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationDescriptor {
    name: CompactString,
    parent: CompactString,
    child: CompactString,
    parent_key: CompactString,
    child_key: CompactString,
}

impl RelationDescriptor {
    /// Builds a descriptor from key column lists.
    ///
    /// Returns [`TesseraError::InvalidOperation`] unless each side names exactly one column.
    pub fn new<S: AsRef<str>>(
        name: impl Into<CompactString>,
        parent: impl Into<CompactString>,
        parent_keys: &[S],
        child: impl Into<CompactString>,
        child_keys: &[S],
    ) -> Result<Self> {
        let name = name.into();
        match (parent_keys, child_keys) {
            ([parent_key], [child_key]) => Ok(Self {
                name,
                parent: parent.into(),
                child: child.into(),
                parent_key: parent_key.as_ref().into(),
                child_key: child_key.as_ref().into(),
            }),
            _ => Err(TesseraError::InvalidOperation(format!(
                "relation '{}' must join exactly one parent key column to one child key column \
                 (got {} and {}); compound-key relations are not supported",
                name,
                parent_keys.len(),
                child_keys.len()
            ))),
        }
    }

    /// Builds a single-column descriptor.
    pub fn one_to_many(
        name: impl Into<CompactString>,
        parent: impl Into<CompactString>,
        parent_key: impl Into<CompactString>,
        child: impl Into<CompactString>,
        child_key: impl Into<CompactString>,
    ) -> Self {
        Self {
            name: name.into(),
            parent: parent.into(),
            child: child.into(),
            parent_key: parent_key.into(),
            child_key: child_key.into(),
        }
    }

    /// Same association registered under another name (e.g. the child's to-one side).
    #[must_use]
    pub fn renamed(&self, name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity name of the "one" side
    #[inline]
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Entity name of the "many" side
    #[inline]
    pub fn child(&self) -> &str {
        &self.child
    }

    #[inline]
    pub fn parent_key(&self) -> &str {
        &self.parent_key
    }

    /// Foreign-key column on the child
    #[inline]
    pub fn child_key(&self) -> &str {
        &self.child_key
    }
}

//------------------------------------------------------------------------------
// EntityMetadata
//------------------------------------------------------------------------------

/// Table, columns and relations of one mapped entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    name: CompactString,
    table: CompactString,
    columns: Vec<ColumnMetadata>,
    relations: Vec<RelationDescriptor>,
}

impl EntityMetadata {
    pub fn new(name: impl Into<CompactString>, table: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: ColumnMetadata) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn push_relation(&mut self, relation: RelationDescriptor) {
        self.relations.push(relation);
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[inline]
    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    #[inline]
    pub fn relations(&self) -> &[RelationDescriptor] {
        &self.relations
    }

    /// Looks up a column by its physical name.
    pub fn column_named(&self, column: &str) -> Result<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|c| c.name() == column)
            .ok_or_else(|| {
                TesseraError::Mapping(format!(
                    "entity '{}' has no column '{}'",
                    self.name, column
                ))
            })
    }

    /// Resolves a property to its column.
    pub fn column_for(&self, property: &str) -> Result<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|c| c.property_name() == property)
            .ok_or_else(|| {
                TesseraError::Mapping(format!(
                    "entity '{}' has no property '{}'",
                    self.name, property
                ))
            })
    }

    /// Resolves a path segment to a relation.
    pub fn relation_for(&self, segment: &str) -> Result<&RelationDescriptor> {
        self.relations
            .iter()
            .find(|r| r.name() == segment)
            .ok_or_else(|| {
                TesseraError::Mapping(format!(
                    "entity '{}' has no relation '{}'",
                    self.name, segment
                ))
            })
    }

    /// Primary-key columns in declaration order.
    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnMetadata> {
        self.columns.iter().filter(|c| c.is_primary_key())
    }

    /// Position of a column in [`columns`](Self::columns).
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name() == column)
            .ok_or_else(|| {
                TesseraError::Mapping(format!(
                    "entity '{}' has no column '{}'",
                    self.name, column
                ))
            })
    }
}

//------------------------------------------------------------------------------
// Model
//------------------------------------------------------------------------------

/// Registry of every mapped entity, keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct Model {
    entities: HashMap<CompactString, EntityMetadata>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, entity: EntityMetadata) -> Self {
        self.insert(entity);
        self
    }

    pub fn insert(&mut self, entity: EntityMetadata) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn entity(&self, name: &str) -> Result<&EntityMetadata> {
        self.entities
            .get(name)
            .ok_or_else(|| TesseraError::Mapping(format!("unknown entity '{name}'")))
    }

    pub(crate) fn entity_mut(&mut self, name: &str) -> Result<&mut EntityMetadata> {
        self.entities
            .get_mut(name)
            .ok_or_else(|| TesseraError::Mapping(format!("unknown entity '{name}'")))
    }

    /// Looks up an entity by its table name.
    pub fn entity_for_table(&self, table: &str) -> Result<&EntityMetadata> {
        self.entities
            .values()
            .find(|e| e.table_name() == table)
            .ok_or_else(|| TesseraError::Mapping(format!("no entity mapped to table '{table}'")))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityMetadata> {
        self.entities.values()
    }

    /// Checks that every relation points at known entities and key columns.
    pub fn validate(&self) -> Result<()> {
        for entity in self.entities.values() {
            for relation in entity.relations() {
                let parent = self.entity(relation.parent())?;
                let child = self.entity(relation.child())?;
                parent.column_named(relation.parent_key())?;
                child.column_named(relation.child_key())?;
                if entity.name() != parent.name() && entity.name() != child.name() {
                    return Err(TesseraError::Mapping(format!(
                        "relation '{}' on entity '{}' does not involve that entity",
                        relation.name(),
                        entity.name()
                    )));
                }
            }
        }
        Ok(())
    }
}
