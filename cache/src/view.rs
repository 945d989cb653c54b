//! Live one-to-many collections kept current by cache notifications.
//!
//! A [`RelationView`] is bound to one owner object and one relation on the
//! owner's entity. On first access it runs a single equality query ("child rows
//! whose foreign key equals the owner's key") and subscribes to the child
//! table's column-changing and row-deleting channels. From then on membership
//! follows every foreign-key change and deletion without querying again, until
//! [`invalidate`](RelationView::invalidate) drops it.

use compact_str::CompactString;
use core::cell::RefCell;
use std::rc::{Rc, Weak};
use tessera_core::{
    FetchSpecification, Predicate, Qualifier, RelationDescriptor, Result, TesseraError,
    tessera_profile_scope, tessera_trace_view,
};
use tessera_types::{RowVersion, Value};

use crate::identity::{IdentityMap, ObjectIdentity, RowId};
use crate::source::RowSource;
use crate::unit_of_work::{ColumnChanging, RowDeleting, RowState, SubscriptionId, UnitOfWork};

enum ViewState {
    Unloaded,
    Loaded {
        members: Vec<ObjectIdentity>,
        subscriptions: [SubscriptionId; 2],
    },
}

/// What the notification handlers need; shared with them through a `Weak`.
struct Binding {
    owner: ObjectIdentity,
    relation: RelationDescriptor,
    child_entity: CompactString,
    child_table: CompactString,
    state: RefCell<ViewState>,
}

impl Binding {
    /// The owner's key value, or `None` when the owner is no longer live.
    fn owner_key(&self, uow: &UnitOfWork) -> Result<Option<Value>> {
        let Some(owner) = uow.get(&self.owner) else {
            return Ok(None);
        };
        if !uow.row_state(owner).is_live() {
            return Ok(None);
        }
        let key = uow.value(owner, self.relation.parent_key(), RowVersion::Current)?;
        Ok((!key.is_null()).then_some(key))
    }

    fn on_column_changing(&self, uow: &UnitOfWork, change: &ColumnChanging<'_>) -> Result<()> {
        if change.column != self.relation.child_key() {
            return Ok(());
        }
        let Some(owner_key) = self.owner_key(uow)? else {
            return Ok(());
        };
        // a self-referencing row mid-insertion is not registered far enough to act on
        if uow.inserting_row() == Some(change.row)
            && matches!(uow.identity_of(change.row)?.key(), [key] if key == change.proposed)
        {
            return Ok(());
        }

        let mut state = self.state.borrow_mut();
        let ViewState::Loaded { members, .. } = &mut *state else {
            return Ok(());
        };

        if *change.proposed == owner_key {
            let identity = uow.identity_of(change.row)?;
            // also heals a member missed by an earlier notification
            if !members.contains(&identity) {
                tessera_trace_view!("member.added", relation = self.relation.name(), member = identity);
                members.push(identity);
            }
        } else if *change.current == owner_key {
            let identity = uow.identity_of(change.row)?;
            if let Some(pos) = members.iter().position(|m| *m == identity) {
                tessera_trace_view!("member.removed", relation = self.relation.name(), member = identity);
                members.remove(pos);
            }
        }
        Ok(())
    }

    fn on_row_deleting(&self, uow: &UnitOfWork, deleting: &RowDeleting<'_>) -> Result<()> {
        let Some(owner_key) = self.owner_key(uow)? else {
            return Ok(());
        };
        let child_key = self.relation.child_key();
        let current = uow.value(deleting.row, child_key, RowVersion::Current)?;
        // stored key, or the current one for a row moved here since it was loaded
        let related = current == owner_key
            || (deleting.state != RowState::New
                && uow.value(deleting.row, child_key, RowVersion::Original)? == owner_key);
        if !related {
            return Ok(());
        }

        let identity = uow.identity_of(deleting.row)?;
        if uow.resolve(&identity).is_none() {
            return Ok(());
        }
        let mut state = self.state.borrow_mut();
        if let ViewState::Loaded { members, .. } = &mut *state {
            if let Some(pos) = members.iter().position(|m| *m == identity) {
                tessera_trace_view!("member.deleted", relation = self.relation.name(), member = identity);
                members.remove(pos);
            }
        }
        Ok(())
    }
}

/// The "many" side of one relation instance.
pub struct RelationView {
    uow: Rc<UnitOfWork>,
    source: Rc<dyn RowSource>,
    binding: Rc<Binding>,
}

impl RelationView {
    /// Binds a view to `owner` and the relation named `relation` on the owner's entity.
    ///
    /// The owner must be the parent side of the relation.
    pub fn new(
        uow: Rc<UnitOfWork>,
        source: Rc<dyn RowSource>,
        owner: ObjectIdentity,
        relation: &str,
    ) -> Result<Self> {
        let model = uow.model();
        let owner_entity = model.entity_for_table(owner.table())?;
        let relation = owner_entity.relation_for(relation)?.clone();
        if relation.parent() != owner_entity.name() {
            return Err(TesseraError::InvalidOperation(format!(
                "relation '{}' is not a to-many relation of entity '{}'",
                relation.name(),
                owner_entity.name()
            )));
        }
        let child = model.entity(relation.child())?;
        let binding = Binding {
            child_entity: child.name().into(),
            child_table: child.table_name().into(),
            owner,
            relation,
            state: RefCell::new(ViewState::Unloaded),
        };
        Ok(Self {
            uow,
            source,
            binding: Rc::new(binding),
        })
    }

    #[inline]
    pub fn owner(&self) -> &ObjectIdentity {
        &self.binding.owner
    }

    #[inline]
    pub fn relation(&self) -> &RelationDescriptor {
        &self.binding.relation
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.binding.state.borrow(), ViewState::Loaded { .. })
    }

    // ==================== lifecycle ====================

    /// Loads the view if it isn't loaded yet.
    pub fn touch(&self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }
        tessera_profile_scope!("view", "load");
        let members = self.query_members()?;
        tessera_trace_view!(
            "load",
            relation = self.binding.relation.name(),
            owner = self.binding.owner,
            members = members.len()
        );

        let weak = Rc::downgrade(&self.binding);
        let for_changes = Weak::clone(&weak);
        let changing = self
            .uow
            .on_column_changing(&self.binding.child_table, move |uow, change| {
                match for_changes.upgrade() {
                    Some(binding) => binding.on_column_changing(uow, change),
                    None => Ok(()),
                }
            });
        let deleting = self
            .uow
            .on_row_deleting(&self.binding.child_table, move |uow, deleting| {
                match weak.upgrade() {
                    Some(binding) => binding.on_row_deleting(uow, deleting),
                    None => Ok(()),
                }
            });

        *self.binding.state.borrow_mut() = ViewState::Loaded {
            members,
            subscriptions: [changing, deleting],
        };
        Ok(())
    }

    /// Drops the members and subscriptions. The next access queries again.
    pub fn invalidate(&self) {
        let previous = self.binding.state.replace(ViewState::Unloaded);
        if let ViewState::Loaded { subscriptions, .. } = previous {
            for id in subscriptions {
                self.uow.unsubscribe(id);
            }
            tessera_trace_view!("invalidate", relation = self.binding.relation.name());
        }
    }

    fn query_members(&self) -> Result<Vec<ObjectIdentity>> {
        let uow = &*self.uow;
        let binding = &*self.binding;
        if uow.get(&binding.owner).is_none() {
            return Err(TesseraError::InvalidOperation(format!(
                "owner {} is not live in this unit of work",
                binding.owner
            )));
        }
        let Some(owner_key) = binding.owner_key(uow)? else {
            return Ok(Vec::new());
        };
        let child_key = binding.relation.child_key();

        let spec = FetchSpecification::new(binding.child_entity.clone()).with_qualifier(
            Qualifier::column(child_key, Predicate::eq(owner_key.clone())),
        );
        let command = uow.compiler().compile_select(&spec)?;
        let fetched = self.source.fetch(&command, &spec)?;

        let mut members = Vec::with_capacity(fetched.len());
        let mut admit = |row: RowId| -> Result<()> {
            if uow.row_state(row).is_live()
                && uow.value(row, child_key, RowVersion::Current)? == owner_key
            {
                let identity = uow.identity_of(row)?;
                if !members.contains(&identity) {
                    members.push(identity);
                }
            }
            Ok(())
        };
        for values in fetched {
            admit(uow.attach(&binding.child_entity, values)?)?;
        }
        // rows added or re-pointed in this unit of work are unknown to the store
        for row in uow.rows(&binding.child_table) {
            admit(row)?;
        }
        Ok(members)
    }

    // ==================== reads ====================

    fn with_members<T>(&self, f: impl FnOnce(&[ObjectIdentity]) -> T) -> Result<T> {
        self.touch()?;
        match &*self.binding.state.borrow() {
            ViewState::Loaded { members, .. } => Ok(f(members)),
            ViewState::Unloaded => Err(TesseraError::InvalidOperation(
                "relation view is not loaded".into(),
            )),
        }
    }

    pub fn len(&self) -> Result<usize> {
        self.with_members(<[ObjectIdentity]>::len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.with_members(<[ObjectIdentity]>::is_empty)
    }

    pub fn get(&self, index: usize) -> Result<Option<ObjectIdentity>> {
        self.with_members(|members| members.get(index).cloned())
    }

    pub fn contains(&self, identity: &ObjectIdentity) -> Result<bool> {
        self.with_members(|members| members.contains(identity))
    }

    pub fn position(&self, identity: &ObjectIdentity) -> Result<Option<usize>> {
        self.with_members(|members| members.iter().position(|m| m == identity))
    }

    /// Snapshot of the current members, in order.
    pub fn members(&self) -> Result<Vec<ObjectIdentity>> {
        self.with_members(<[ObjectIdentity]>::to_vec)
    }

    // ==================== mutation ====================

    /// Appends `member` by pointing its foreign key at the owner.
    ///
    /// The resulting column-changing notification does the insertion; the
    /// member's position is returned.
    pub fn add(&self, member: RowId) -> Result<usize> {
        self.touch()?;
        let owner_key = self.binding.owner_key(&self.uow)?.ok_or_else(|| {
            TesseraError::InvalidOperation(format!(
                "owner {} has no key to relate to",
                self.binding.owner
            ))
        })?;
        self.uow
            .set_value(member, self.binding.relation.child_key(), owner_key)?;

        let identity = self.uow.identity_of(member)?;
        self.position(&identity)?.ok_or_else(|| {
            TesseraError::InvalidOperation(format!(
                "{identity} did not join relation '{}'",
                self.binding.relation.name()
            ))
        })
    }

    /// Always fails: members are appended through [`add`](Self::add).
    pub fn insert(&self, index: usize, member: RowId) -> Result<usize> {
        Err(TesseraError::InvalidOperation(format!(
            "cannot insert {member} at position {index} of relation '{}': relation views are append-only",
            self.binding.relation.name()
        )))
    }

    /// Detaches `member` by clearing its foreign key.
    pub fn remove(&self, member: RowId) -> Result<()> {
        self.touch()?;
        self.uow
            .set_value(member, self.binding.relation.child_key(), Value::Null)
    }
}

impl Drop for RelationView {
    fn drop(&mut self) {
        self.invalidate();
    }
}
