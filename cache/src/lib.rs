//! Change-tracked relational cache and incrementally maintained relation views.
//!
//! - [`UnitOfWork`] - rows, row states, identity maps and synchronous
//!   column-changing / row-deleting notifications
//! - [`RelationView`] - the live "many" side of one relation instance
//! - [`RowSource`] - the seam to the backing store used for the initial load

mod identity;
mod source;
mod unit_of_work;
mod view;

pub use identity::{IdentityMap, KeyValues, ObjectIdentity, RowId};
pub use source::RowSource;
pub use unit_of_work::{
    CachedRow, ColumnChanging, ColumnChangingListener, RowDeleting, RowDeletingListener,
    RowState, SubscriptionId, UnitOfWork,
};
pub use view::RelationView;
