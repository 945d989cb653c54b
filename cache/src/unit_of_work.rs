//! Change-tracked, in-memory relational cache.
//!
//! A [`UnitOfWork`] owns every row it has seen, their current and original
//! values, the identity maps and the per-table notification channels. Column
//! changes and row deletions are announced synchronously to subscribed
//! listeners *before* they are applied; a listener returning an error aborts
//! the mutation.
//!
//! No internal borrow is held while listeners run, so a listener may read from
//! or mutate the unit of work that is notifying it.

use compact_str::CompactString;
use core::cell::{Cell, RefCell};
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::rc::Rc;
use tessera_core::{
    CompilerConfig, EntityMetadata, Model, Result, RowAccess, SqlCompiler, TesseraError,
    tessera_profile_scope, tessera_trace_view,
};
use tessera_types::{RowVersion, Value};

use crate::identity::{IdentityMap, KeyValues, ObjectIdentity, RowId};

/// Lifecycle of a cached row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowState {
    /// Created in this unit of work, never persisted
    New,
    /// Matches what was loaded from the store
    Unchanged,
    Modified,
    /// Deleted; kept until changes are accepted
    Deleted,
    /// A new row deleted before it was persisted, or a row this unit of work doesn't know
    Detached,
}

impl RowState {
    #[inline]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::New | Self::Unchanged | Self::Modified)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A pending column change, announced before the value is written.
#[derive(Debug)]
pub struct ColumnChanging<'a> {
    pub row: RowId,
    pub table: &'a str,
    pub column: &'a str,
    pub proposed: &'a Value,
    pub current: &'a Value,
}

/// A pending row deletion, announced before the row leaves the live identity map.
#[derive(Debug)]
pub struct RowDeleting<'a> {
    pub row: RowId,
    pub table: &'a str,
    /// State of the row before the deletion.
    pub state: RowState,
}

pub type ColumnChangingListener = Rc<dyn Fn(&UnitOfWork, &ColumnChanging<'_>) -> Result<()>>;
pub type RowDeletingListener = Rc<dyn Fn(&UnitOfWork, &RowDeleting<'_>) -> Result<()>>;

//------------------------------------------------------------------------------
// Storage
//------------------------------------------------------------------------------

struct RowRecord {
    entity: CompactString,
    table: CompactString,
    identity: ObjectIdentity,
    /// One value per entity column, in metadata order.
    current: Vec<Value>,
    original: Option<Vec<Value>>,
    state: RowState,
}

#[derive(Default)]
struct RowStore {
    next_id: u64,
    records: HashMap<RowId, RowRecord>,
    /// Rows of each table in registration order; detached rows are removed.
    by_table: HashMap<CompactString, Vec<RowId>>,
    live: HashMap<ObjectIdentity, RowId>,
    tombstones: HashMap<ObjectIdentity, RowId>,
}

impl RowStore {
    fn register(&mut self, record: RowRecord) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.by_table
            .entry(record.table.clone())
            .or_default()
            .push(id);
        self.live.insert(record.identity.clone(), id);
        self.records.insert(id, record);
        id
    }

    fn record(&self, row: RowId) -> Result<&RowRecord> {
        self.records.get(&row).ok_or_else(|| untracked(row))
    }

    fn record_mut(&mut self, row: RowId) -> Result<&mut RowRecord> {
        self.records.get_mut(&row).ok_or_else(|| untracked(row))
    }
}

fn untracked(row: RowId) -> TesseraError {
    TesseraError::InvalidOperation(format!("{row} is not tracked by this unit of work"))
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    column_changing: HashMap<CompactString, Vec<(SubscriptionId, ColumnChangingListener)>>,
    row_deleting: HashMap<CompactString, Vec<(SubscriptionId, RowDeletingListener)>>,
}

impl Listeners {
    fn next(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}

//------------------------------------------------------------------------------
// UnitOfWork
//------------------------------------------------------------------------------

pub struct UnitOfWork {
    model: Model,
    config: CompilerConfig,
    store: RefCell<RowStore>,
    listeners: RefCell<Listeners>,
    /// Row whose non-key columns are currently being populated by `insert`.
    inserting: Cell<Option<RowId>>,
}

impl UnitOfWork {
    /// Creates a shared unit of work over `model` with the default compiler settings.
    pub fn new(model: Model) -> Rc<Self> {
        Self::with_config(model, CompilerConfig::default())
    }

    pub fn with_config(model: Model, config: CompilerConfig) -> Rc<Self> {
        Rc::new(Self {
            model,
            config,
            store: RefCell::new(RowStore::default()),
            listeners: RefCell::new(Listeners::default()),
            inserting: Cell::new(None),
        })
    }

    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[inline]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// A fresh compiler configured for this unit of work.
    pub fn compiler(&self) -> SqlCompiler<'_> {
        SqlCompiler::from_config(&self.model, &self.config)
    }

    // ==================== row lifecycle ====================

    /// Registers a row read from the store, with values in metadata column order.
    ///
    /// A row whose identity is already cached (live or tombstoned) keeps its
    /// cached state and values; its existing handle is returned.
    pub fn attach(&self, entity: &str, values: Vec<Value>) -> Result<RowId> {
        let metadata = self.model.entity(entity)?;
        if values.len() != metadata.columns().len() {
            return Err(TesseraError::Mapping(format!(
                "entity '{}' has {} columns, row has {} values",
                metadata.name(),
                metadata.columns().len(),
                values.len()
            )));
        }
        let identity = identity_from(metadata, &values)?;

        let mut store = self.store.borrow_mut();
        if let Some(&row) = store
            .live
            .get(&identity)
            .or_else(|| store.tombstones.get(&identity))
        {
            return Ok(row);
        }
        Ok(store.register(RowRecord {
            entity: metadata.name().into(),
            table: metadata.table_name().into(),
            identity,
            original: Some(values.clone()),
            current: values,
            state: RowState::Unchanged,
        }))
    }

    /// Adds a new row.
    ///
    /// Primary-key values are stored first and must all be present. Every other
    /// non-null value is then written through [`set_value`](Self::set_value), so
    /// listeners observe the new row column by column. If a listener rejects one
    /// of them, row-deleting listeners are told and the row is forgotten.
    pub fn insert<I, S, V>(&self, entity: &str, values: I) -> Result<RowId>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Value>,
    {
        tessera_profile_scope!("cache", "insert");
        let metadata = self.model.entity(entity)?;
        let mut current = vec![Value::Null; metadata.columns().len()];
        for (column, value) in values {
            current[metadata.column_index(column.as_ref())?] = value.into();
        }
        let identity = identity_from(metadata, &current)?;

        let pending: Vec<(usize, Value)> = metadata
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| !column.is_primary_key())
            .filter_map(|(idx, _)| {
                let value = core::mem::take(&mut current[idx]);
                (!value.is_null()).then_some((idx, value))
            })
            .collect();

        let row = {
            let mut store = self.store.borrow_mut();
            if store.live.contains_key(&identity) {
                return Err(TesseraError::InvalidOperation(format!(
                    "{identity} is already tracked by this unit of work"
                )));
            }
            store.register(RowRecord {
                entity: metadata.name().into(),
                table: metadata.table_name().into(),
                identity,
                current,
                original: None,
                state: RowState::New,
            })
        };

        let previous = self.inserting.replace(Some(row));
        let populated = pending
            .into_iter()
            .try_for_each(|(idx, value)| self.set_value(row, metadata.columns()[idx].name(), value));
        self.inserting.set(previous);
        if let Err(err) = populated {
            self.discard_new(row, metadata.table_name());
            return Err(err);
        }
        Ok(row)
    }

    /// Unregisters a partially inserted row once listeners have dropped it.
    fn discard_new(&self, row: RowId, table: &str) {
        // listeners already saw some of its columns
        if let Err(_err) = self.notify_row_deleting(&RowDeleting {
            row,
            table,
            state: RowState::New,
        }) {
            tessera_trace_view!("insert.rollback", row = row, error = _err);
        }

        let mut guard = self.store.borrow_mut();
        let store = &mut *guard;
        let Some(record) = store.records.remove(&row) else {
            return;
        };
        if store.live.get(&record.identity) == Some(&row) {
            store.live.remove(&record.identity);
        }
        if store.tombstones.get(&record.identity) == Some(&row) {
            store.tombstones.remove(&record.identity);
        }
        if let Some(rows) = store.by_table.get_mut(table) {
            rows.retain(|r| *r != row);
        }
    }

    /// Changes one column of a live row.
    ///
    /// Column-changing listeners of the row's table run first, with the proposed
    /// and current values; any listener error leaves the row untouched.
    /// Primary-key columns cannot be changed.
    pub fn set_value(&self, row: RowId, column: &str, value: impl Into<Value>) -> Result<()> {
        tessera_profile_scope!("cache", "set_value");
        let value = value.into();
        let (table, idx, current) = {
            let store = self.store.borrow();
            let record = store.record(row)?;
            ensure_live(row, record.state)?;
            let metadata = self.model.entity(&record.entity)?;
            let idx = metadata.column_index(column)?;
            if metadata.columns()[idx].is_primary_key() {
                return Err(TesseraError::InvalidOperation(format!(
                    "primary key column '{column}' of {} cannot be changed",
                    record.identity
                )));
            }
            (record.table.clone(), idx, record.current[idx].clone())
        };

        self.notify_column_changing(&ColumnChanging {
            row,
            table: &table,
            column,
            proposed: &value,
            current: &current,
        })?;

        let mut store = self.store.borrow_mut();
        let record = store.record_mut(row)?;
        ensure_live(row, record.state)?;
        record.current[idx] = value;
        if record.state == RowState::Unchanged {
            record.state = RowState::Modified;
        }
        Ok(())
    }

    /// Deletes a live row.
    ///
    /// Row-deleting listeners run first. A row that was never persisted becomes
    /// [`RowState::Detached`]; any other becomes [`RowState::Deleted`]. Either
    /// way its identity moves from the live map to the tombstones.
    pub fn delete(&self, row: RowId) -> Result<()> {
        tessera_profile_scope!("cache", "delete");
        let (table, state) = {
            let store = self.store.borrow();
            let record = store.record(row)?;
            ensure_live(row, record.state)?;
            (record.table.clone(), record.state)
        };

        self.notify_row_deleting(&RowDeleting {
            row,
            table: &table,
            state,
        })?;

        let mut guard = self.store.borrow_mut();
        let store = &mut *guard;
        let record = store.record_mut(row)?;
        if !record.state.is_live() {
            // deleted re-entrantly by a listener
            return Ok(());
        }
        let identity = record.identity.clone();
        if record.state == RowState::New {
            record.state = RowState::Detached;
            if let Some(rows) = store.by_table.get_mut(&table) {
                rows.retain(|r| *r != row);
            }
        } else {
            record.state = RowState::Deleted;
        }
        store.live.remove(&identity);
        store.tombstones.insert(identity, row);
        Ok(())
    }

    /// Marks all pending changes as persisted.
    ///
    /// New and modified rows become unchanged with their current values as the
    /// new original version; deleted and detached rows are forgotten.
    pub fn accept_changes(&self) {
        let mut guard = self.store.borrow_mut();
        let store = &mut *guard;
        let mut purged = Vec::new();
        for (id, record) in store.records.iter_mut() {
            match record.state {
                RowState::New | RowState::Modified => {
                    record.original = Some(record.current.clone());
                    record.state = RowState::Unchanged;
                }
                RowState::Deleted | RowState::Detached => purged.push(*id),
                RowState::Unchanged => {}
            }
        }
        for id in purged {
            let Some(record) = store.records.remove(&id) else {
                continue;
            };
            if store.tombstones.get(&record.identity) == Some(&id) {
                store.tombstones.remove(&record.identity);
            }
            if let Some(rows) = store.by_table.get_mut(&record.table) {
                rows.retain(|r| *r != id);
            }
        }
    }

    // ==================== reads ====================

    /// State of a row; rows this unit of work has forgotten are detached.
    pub fn row_state(&self, row: RowId) -> RowState {
        self.store
            .borrow()
            .records
            .get(&row)
            .map_or(RowState::Detached, |r| r.state)
    }

    /// Reads a column. Rows without an original version return their current
    /// value for [`RowVersion::Original`].
    pub fn value(&self, row: RowId, column: &str, version: RowVersion) -> Result<Value> {
        let store = self.store.borrow();
        let record = store.record(row)?;
        let idx = self.model.entity(&record.entity)?.column_index(column)?;
        let values = match (version, &record.original) {
            (RowVersion::Original, Some(original)) => original,
            _ => &record.current,
        };
        Ok(values[idx].clone())
    }

    pub fn identity_of(&self, row: RowId) -> Result<ObjectIdentity> {
        Ok(self.store.borrow().record(row)?.identity.clone())
    }

    /// Live row for an identity.
    pub fn row_for(&self, identity: &ObjectIdentity) -> Option<RowId> {
        self.store.borrow().live.get(identity).copied()
    }

    /// Rows of `table` in the order they entered the unit of work, deleted rows included.
    pub fn rows(&self, table: &str) -> Vec<RowId> {
        self.store
            .borrow()
            .by_table
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// The row `insert` is currently populating, if any.
    #[inline]
    pub fn inserting_row(&self) -> Option<RowId> {
        self.inserting.get()
    }

    /// A [`RowAccess`] view of a cached row, for INSERT/UPDATE/DELETE compilation.
    pub fn cached_row(&self, row: RowId) -> Result<CachedRow<'_>> {
        let entity = self.store.borrow().record(row)?.entity.clone();
        Ok(CachedRow {
            uow: self,
            row,
            entity,
        })
    }

    // ==================== notifications ====================

    pub fn on_column_changing<F>(&self, table: &str, listener: F) -> SubscriptionId
    where
        F: Fn(&UnitOfWork, &ColumnChanging<'_>) -> Result<()> + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next();
        listeners
            .column_changing
            .entry(CompactString::from(table))
            .or_default()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn on_row_deleting<F>(&self, table: &str, listener: F) -> SubscriptionId
    where
        F: Fn(&UnitOfWork, &RowDeleting<'_>) -> Result<()> + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next();
        listeners
            .row_deleting
            .entry(CompactString::from(table))
            .or_default()
            .push((id, Rc::new(listener)));
        id
    }

    /// Cancels a subscription. Returns `false` if it was already cancelled.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        for subscribed in listeners.column_changing.values_mut() {
            if let Some(pos) = subscribed.iter().position(|(sid, _)| *sid == id) {
                subscribed.remove(pos);
                return true;
            }
        }
        for subscribed in listeners.row_deleting.values_mut() {
            if let Some(pos) = subscribed.iter().position(|(sid, _)| *sid == id) {
                subscribed.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of active subscriptions on `table`, both channels.
    pub fn subscription_count(&self, table: &str) -> usize {
        let listeners = self.listeners.borrow();
        listeners.column_changing.get(table).map_or(0, Vec::len)
            + listeners.row_deleting.get(table).map_or(0, Vec::len)
    }

    fn notify_column_changing(&self, change: &ColumnChanging<'_>) -> Result<()> {
        let snapshot: SmallVec<[ColumnChangingListener; 4]> = self
            .listeners
            .borrow()
            .column_changing
            .get(change.table)
            .map(|subscribed| subscribed.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();
        for listener in snapshot {
            listener(self, change)?;
        }
        Ok(())
    }

    fn notify_row_deleting(&self, deleting: &RowDeleting<'_>) -> Result<()> {
        let snapshot: SmallVec<[RowDeletingListener; 4]> = self
            .listeners
            .borrow()
            .row_deleting
            .get(deleting.table)
            .map(|subscribed| subscribed.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default();
        for listener in snapshot {
            listener(self, deleting)?;
        }
        Ok(())
    }
}

impl IdentityMap for UnitOfWork {
    fn get(&self, identity: &ObjectIdentity) -> Option<RowId> {
        self.row_for(identity)
    }

    fn get_tombstoned(&self, identity: &ObjectIdentity) -> Option<RowId> {
        self.store.borrow().tombstones.get(identity).copied()
    }
}

fn ensure_live(row: RowId, state: RowState) -> Result<()> {
    if state.is_live() {
        Ok(())
    } else {
        Err(TesseraError::InvalidOperation(format!(
            "{row} is {state:?} and cannot be changed"
        )))
    }
}

fn identity_from(metadata: &EntityMetadata, values: &[Value]) -> Result<ObjectIdentity> {
    let key: KeyValues = metadata
        .columns()
        .iter()
        .zip(values)
        .filter(|(column, _)| column.is_primary_key())
        .map(|(_, value)| value.clone())
        .collect();
    if key.is_empty() {
        return Err(TesseraError::Mapping(format!(
            "entity '{}' has no primary key",
            metadata.name()
        )));
    }
    if key.iter().any(Value::is_null) {
        return Err(TesseraError::InvalidOperation(format!(
            "primary key of a row of entity '{}' cannot be null",
            metadata.name()
        )));
    }
    Ok(ObjectIdentity::new(metadata.table_name(), key))
}

//------------------------------------------------------------------------------
// CachedRow
//------------------------------------------------------------------------------

/// Borrowed handle to one cached row.
pub struct CachedRow<'a> {
    uow: &'a UnitOfWork,
    row: RowId,
    entity: CompactString,
}

impl CachedRow<'_> {
    #[inline]
    pub fn id(&self) -> RowId {
        self.row
    }
}

impl RowAccess for CachedRow<'_> {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn value(&self, column: &str, version: RowVersion) -> Option<Value> {
        self.uow.value(self.row, column, version).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{ColumnMetadata, EntityMetadata};

    fn model() -> Model {
        Model::new().with(
            EntityMetadata::new("OrderLine", "OrderLines")
                .column(ColumnMetadata::new("Id").primary_key())
                .column(ColumnMetadata::new("OrderId"))
                .column(ColumnMetadata::new("Sku")),
        )
    }

    #[test]
    fn test_insert_populates_through_notifications() {
        let uow = UnitOfWork::new(model());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        uow.on_column_changing("OrderLines", move |uow, change| {
            assert_eq!(uow.inserting_row(), Some(change.row));
            log.borrow_mut()
                .push((change.column.to_owned(), change.current.clone(), change.proposed.clone()));
            Ok(())
        });

        let row = uow
            .insert("OrderLine", [("Id", Value::from(1)), ("OrderId", Value::from(5))])
            .unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![("OrderId".to_owned(), Value::Null, Value::Integer(5))]
        );
        assert_eq!(uow.row_state(row), RowState::New);
        assert_eq!(uow.inserting_row(), None);
        assert_eq!(
            uow.value(row, "OrderId", RowVersion::Original).unwrap(),
            Value::Integer(5)
        );
    }

    #[test]
    fn test_listener_sees_value_before_it_is_applied() {
        let uow = UnitOfWork::new(model());
        let row = uow
            .attach("OrderLine", vec![1.into(), 5.into(), "A".into()])
            .unwrap();
        uow.on_column_changing("OrderLines", |uow, change| {
            let stored = uow.value(change.row, change.column, RowVersion::Current)?;
            assert_eq!(&stored, change.current);
            Ok(())
        });

        uow.set_value(row, "OrderId", 6).unwrap();
        assert_eq!(uow.row_state(row), RowState::Modified);
        assert_eq!(
            uow.value(row, "OrderId", RowVersion::Original).unwrap(),
            Value::Integer(5)
        );
        assert_eq!(
            uow.value(row, "OrderId", RowVersion::Current).unwrap(),
            Value::Integer(6)
        );
    }

    #[test]
    fn test_listener_error_aborts_change() {
        let uow = UnitOfWork::new(model());
        let row = uow
            .attach("OrderLine", vec![1.into(), 5.into(), "A".into()])
            .unwrap();
        let id = uow.on_column_changing("OrderLines", |_, _| {
            Err(TesseraError::InvalidOperation("vetoed".into()))
        });

        assert!(uow.set_value(row, "Sku", "B").is_err());
        assert_eq!(uow.row_state(row), RowState::Unchanged);

        assert!(uow.unsubscribe(id));
        assert!(!uow.unsubscribe(id));
        uow.set_value(row, "Sku", "B").unwrap();
    }

    #[test]
    fn test_rejected_insert_is_rolled_back() {
        let uow = UnitOfWork::new(model());
        uow.on_column_changing("OrderLines", |_, change| {
            if change.column == "Sku" {
                return Err(TesseraError::InvalidOperation("vetoed".into()));
            }
            Ok(())
        });
        let deleted = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&deleted);
        uow.on_row_deleting("OrderLines", move |uow, deleting| {
            log.borrow_mut().push((
                deleting.state,
                uow.value(deleting.row, "OrderId", RowVersion::Current)?,
            ));
            Ok(())
        });

        let result = uow.insert(
            "OrderLine",
            [
                ("Id", Value::from(1)),
                ("OrderId", Value::from(5)),
                ("Sku", Value::from("A")),
            ],
        );

        assert!(matches!(result, Err(TesseraError::InvalidOperation(_))));
        assert_eq!(*deleted.borrow(), vec![(RowState::New, Value::Integer(5))]);
        assert_eq!(uow.row_for(&ObjectIdentity::single("OrderLines", 1)), None);
        assert!(uow.rows("OrderLines").is_empty());
        assert_eq!(uow.inserting_row(), None);

        // the identity is free again
        let row = uow.insert("OrderLine", [("Id", 1)]).unwrap();
        assert_eq!(uow.row_state(row), RowState::New);
    }

    #[test]
    fn test_primary_key_is_immutable() {
        let uow = UnitOfWork::new(model());
        let row = uow
            .attach("OrderLine", vec![1.into(), 5.into(), "A".into()])
            .unwrap();
        assert!(matches!(
            uow.set_value(row, "Id", 2),
            Err(TesseraError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_delete_moves_identity_to_tombstones() {
        let uow = UnitOfWork::new(model());
        let kept = uow
            .attach("OrderLine", vec![1.into(), 5.into(), "A".into()])
            .unwrap();
        let fresh = uow
            .insert("OrderLine", [("Id", Value::from(2))])
            .unwrap();
        let identity = uow.identity_of(kept).unwrap();

        uow.delete(kept).unwrap();
        uow.delete(fresh).unwrap();

        assert_eq!(uow.row_state(kept), RowState::Deleted);
        assert_eq!(uow.row_state(fresh), RowState::Detached);
        assert_eq!(uow.get(&identity), None);
        assert_eq!(uow.get_tombstoned(&identity), Some(kept));
        assert_eq!(uow.rows("OrderLines"), vec![kept]);
        assert!(uow.delete(kept).is_err());

        // reloading a deleted row must not resurrect it
        let again = uow
            .attach("OrderLine", vec![1.into(), 5.into(), "A".into()])
            .unwrap();
        assert_eq!(again, kept);

        uow.accept_changes();
        assert_eq!(uow.row_state(kept), RowState::Detached);
        assert_eq!(uow.get_tombstoned(&identity), None);
        assert!(uow.rows("OrderLines").is_empty());
    }

    #[test]
    fn test_accept_changes() {
        let uow = UnitOfWork::new(model());
        let row = uow
            .insert("OrderLine", [("Id", Value::from(1)), ("Sku", Value::from("A"))])
            .unwrap();
        uow.accept_changes();
        assert_eq!(uow.row_state(row), RowState::Unchanged);

        uow.set_value(row, "Sku", "B").unwrap();
        assert_eq!(
            uow.value(row, "Sku", RowVersion::Original).unwrap(),
            Value::from("A")
        );
    }

    #[test]
    fn test_insert_requires_key() {
        let uow = UnitOfWork::new(model());
        assert!(matches!(
            uow.insert("OrderLine", [("Sku", "A")]),
            Err(TesseraError::InvalidOperation(_))
        ));
        uow.insert("OrderLine", [("Id", 1)]).unwrap();
        assert!(matches!(
            uow.insert("OrderLine", [("Id", 1)]),
            Err(TesseraError::InvalidOperation(_))
        ));
        assert!(matches!(
            uow.insert("OrderLine", [("Id", 2), ("Nope", 3)]),
            Err(TesseraError::Mapping(_))
        ));
    }

    #[test]
    fn test_cached_row_access() {
        let uow = UnitOfWork::new(model());
        let row = uow
            .attach("OrderLine", vec![1.into(), Value::Null, "A".into()])
            .unwrap();
        uow.set_value(row, "Sku", "B").unwrap();

        let cached = uow.cached_row(row).unwrap();
        assert_eq!(cached.entity(), "OrderLine");
        assert_eq!(cached.value("Sku", RowVersion::Original), Some("A".into()));
        assert_eq!(cached.value("Sku", RowVersion::Current), Some("B".into()));
        assert_eq!(cached.value("Nope", RowVersion::Current), None);
    }
}
