use std::rc::Rc;

use tessera::prelude::*;

mod common;
use common::{StoreRows, shop_model};

struct Fixture {
    uow: Rc<UnitOfWork>,
    store: Rc<StoreRows>,
}

impl Fixture {
    /// Orders 5 and 6 in the cache; lines 1 and 2 of order 5 and line 3 of
    /// order 6 only in the store.
    fn new() -> Self {
        let model = shop_model();
        let store = Rc::new(StoreRows::new(&model));
        store.put("OrderLine", line(1, 5));
        store.put("OrderLine", line(2, 5));
        store.put("OrderLine", line(3, 6));

        let uow = UnitOfWork::new(model);
        for id in [5, 6] {
            uow.attach("Order", vec![id.into(), 1.into(), Value::Null, 0.0.into()])
                .unwrap();
        }
        Self { uow, store }
    }

    fn view(&self, order: i64) -> RelationView {
        RelationView::new(
            Rc::clone(&self.uow),
            Rc::clone(&self.store) as Rc<dyn RowSource>,
            ObjectIdentity::single("Orders", order),
            "lines",
        )
        .unwrap()
    }

    fn line_row(&self, id: i64) -> RowId {
        self.uow.row_for(&line_identity(id)).unwrap()
    }
}

fn line(id: i64, order: i64) -> Vec<Value> {
    vec![id.into(), order.into(), "widget".into(), 1.into()]
}

fn line_identity(id: i64) -> ObjectIdentity {
    ObjectIdentity::single("OrderLines", id)
}

#[test]
fn load_runs_one_equality_query() {
    let fx = Fixture::new();
    let view = fx.view(5);
    assert!(!view.is_loaded());

    assert_eq!(
        view.members().unwrap(),
        vec![line_identity(1), line_identity(2)]
    );
    assert_eq!(view.len().unwrap(), 2);
    assert!(!view.contains(&line_identity(3)).unwrap());
    assert_eq!(
        fx.store.queries(),
        [r#"SELECT "Id", "OrderId", "Product", "Quantity" FROM "OrderLines" WHERE "OrderId" = @OrderId1"#]
    );
}

#[test]
fn new_row_pointing_at_owner_joins_without_query() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();

    fx.uow
        .insert(
            "OrderLine",
            [("Id", Value::from(10)), ("OrderId", Value::from(5))],
        )
        .unwrap();

    assert_eq!(view.position(&line_identity(10)).unwrap(), Some(2));
    assert_eq!(fx.store.query_count(), 1);
}

#[test]
fn nulling_foreign_key_removes_member() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();

    fx.uow.set_value(fx.line_row(1), "OrderId", Value::Null).unwrap();

    assert_eq!(view.members().unwrap(), vec![line_identity(2)]);
    assert_eq!(fx.store.query_count(), 1);
}

#[test]
fn deleting_member_removes_it_using_original_value() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();

    let row = fx.line_row(2);
    fx.uow.delete(row).unwrap();
    assert_eq!(view.members().unwrap(), vec![line_identity(1)]);

    // moved away and then deleted: already gone, deletion must not disturb anything
    let row = fx.line_row(1);
    fx.uow.set_value(row, "OrderId", 6).unwrap();
    fx.uow.delete(row).unwrap();
    assert!(view.is_empty().unwrap());
}

#[test]
fn deleting_unrelated_row_leaves_view_unchanged() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();
    let other = fx.view(6);
    other.touch().unwrap();

    fx.uow.delete(fx.line_row(3)).unwrap();

    assert_eq!(
        view.members().unwrap(),
        vec![line_identity(1), line_identity(2)]
    );
    assert!(other.is_empty().unwrap());
}

#[test]
fn deleting_unsaved_row_reads_current_value() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();

    let row = fx
        .uow
        .insert("OrderLine", [("Id", Value::from(11)), ("OrderId", Value::from(5))])
        .unwrap();
    assert!(view.contains(&line_identity(11)).unwrap());

    fx.uow.delete(row).unwrap();
    assert_eq!(fx.uow.row_state(row), RowState::Detached);
    assert!(!view.contains(&line_identity(11)).unwrap());
}

#[test]
fn moving_a_row_updates_both_views() {
    let fx = Fixture::new();
    let five = fx.view(5);
    let six = fx.view(6);

    let row = {
        five.touch().unwrap();
        fx.line_row(1)
    };
    six.touch().unwrap();

    fx.uow.set_value(row, "OrderId", 6).unwrap();

    assert_eq!(five.members().unwrap(), vec![line_identity(2)]);
    assert_eq!(
        six.members().unwrap(),
        vec![line_identity(3), line_identity(1)]
    );
}

#[test]
fn add_and_remove_go_through_the_cache() {
    let fx = Fixture::new();
    let five = fx.view(5);
    let six = fx.view(6);
    six.touch().unwrap();

    let row = fx.uow.insert("OrderLine", [("Id", 20)]).unwrap();
    assert_eq!(six.add(row).unwrap(), 1);
    assert_eq!(
        fx.uow.value(row, "OrderId", RowVersion::Current).unwrap(),
        Value::Integer(6)
    );

    // re-adding an existing member keeps its position
    assert_eq!(six.add(row).unwrap(), 1);
    assert_eq!(six.len().unwrap(), 2);

    assert_eq!(five.add(row).unwrap(), 2);
    assert!(!six.contains(&line_identity(20)).unwrap());

    five.remove(row).unwrap();
    assert!(!five.contains(&line_identity(20)).unwrap());
    assert_eq!(
        fx.uow.value(row, "OrderId", RowVersion::Current).unwrap(),
        Value::Null
    );
    assert!(matches!(
        five.insert(0, row),
        Err(TesseraError::InvalidOperation(_))
    ));
}

#[test]
fn invalidate_then_access_queries_again() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();

    view.invalidate();
    assert!(!view.is_loaded());

    // changes while unloaded are not replayed; the cache wins over the store on reload
    fx.uow.set_value(fx.line_row(1), "OrderId", 6).unwrap();
    fx.uow
        .insert("OrderLine", [("Id", Value::from(30)), ("OrderId", Value::from(5))])
        .unwrap();

    assert_eq!(
        view.members().unwrap(),
        vec![line_identity(2), line_identity(30)]
    );
    assert_eq!(fx.store.query_count(), 2);
}

#[test]
fn deleted_owner_ignores_notifications() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();

    let owner = fx.uow.row_for(&ObjectIdentity::single("Orders", 5)).unwrap();
    fx.uow.delete(owner).unwrap();
    fx.uow.set_value(fx.line_row(1), "OrderId", Value::Null).unwrap();

    assert_eq!(
        view.members().unwrap(),
        vec![line_identity(1), line_identity(2)]
    );
}

#[test]
fn store_errors_propagate() {
    let fx = Fixture::new();
    let failing: Rc<dyn RowSource> = Rc::new(
        |_: &CompiledCommand, _: &FetchSpecification| -> tessera::Result<Vec<Vec<Value>>> {
            Err(TesseraError::Store("connection reset".into()))
        },
    );
    let view = RelationView::new(
        Rc::clone(&fx.uow),
        failing,
        ObjectIdentity::single("Orders", 5),
        "lines",
    )
    .unwrap();

    assert!(matches!(view.touch(), Err(TesseraError::Store(_))));
    assert!(!view.is_loaded());
    assert_eq!(fx.uow.subscription_count("OrderLines"), 0);
}

#[test]
fn load_includes_rows_re_pointed_in_this_unit_of_work() {
    let fx = Fixture::new();
    let six = fx.view(6);
    six.touch().unwrap();
    fx.uow.set_value(fx.line_row(3), "OrderId", 5).unwrap();

    // the store still has line 3 under order 6
    let five = fx.view(5);
    assert_eq!(
        five.members().unwrap(),
        vec![line_identity(1), line_identity(2), line_identity(3)]
    );
    assert!(six.is_empty().unwrap());
}

#[test]
fn deleting_a_moved_row_leaves_its_new_view() {
    let fx = Fixture::new();
    let five = fx.view(5);
    let six = fx.view(6);
    five.touch().unwrap();
    six.touch().unwrap();

    let row = fx.line_row(1);
    fx.uow.set_value(row, "OrderId", 6).unwrap();
    assert!(six.contains(&line_identity(1)).unwrap());

    fx.uow.delete(row).unwrap();
    assert_eq!(six.members().unwrap(), vec![line_identity(3)]);
    assert_eq!(five.members().unwrap(), vec![line_identity(2)]);
}

#[test]
fn rejected_insert_does_not_leave_a_member_behind() {
    let fx = Fixture::new();
    let view = fx.view(5);
    view.touch().unwrap();
    fx.uow.on_column_changing("OrderLines", |_, change| {
        if change.column == "Product" {
            return Err(TesseraError::InvalidOperation("no products today".into()));
        }
        Ok(())
    });

    let result = fx.uow.insert(
        "OrderLine",
        [
            ("Id", Value::from(40)),
            ("OrderId", Value::from(5)),
            ("Product", Value::from("gadget")),
        ],
    );

    assert!(result.is_err());
    assert_eq!(fx.uow.row_for(&line_identity(40)), None);
    assert_eq!(
        view.members().unwrap(),
        vec![line_identity(1), line_identity(2)]
    );
}

fn category_model() -> Model {
    Model::new().with(
        EntityMetadata::new("Category", "Categories")
            .column(ColumnMetadata::new("Id").primary_key())
            .column(ColumnMetadata::new("Name"))
            .column(ColumnMetadata::new("ParentId"))
            .relation(RelationDescriptor::one_to_many(
                "children", "Category", "Id", "Category", "ParentId",
            )),
    )
}

#[test]
fn self_parented_row_is_skipped_while_inserting_then_rejoins() {
    let model = category_model();
    let store = Rc::new(StoreRows::new(&model));
    let uow = UnitOfWork::new(model);
    let view = Rc::new(
        RelationView::new(
            Rc::clone(&uow),
            Rc::clone(&store) as Rc<dyn RowSource>,
            ObjectIdentity::single("Categories", 2),
            "children",
        )
        .unwrap(),
    );

    // load the view as soon as its owner exists, before the insert sets ParentId
    let weak = Rc::downgrade(&view);
    uow.on_column_changing("Categories", move |_, change| {
        if change.column == "Name" {
            if let Some(view) = weak.upgrade() {
                view.touch()?;
            }
        }
        Ok(())
    });

    let row = uow
        .insert(
            "Category",
            [
                ("Id", Value::from(2)),
                ("Name", Value::from("root")),
                ("ParentId", Value::from(2)),
            ],
        )
        .unwrap();
    assert!(view.is_loaded());
    assert!(view.is_empty().unwrap());
    assert_eq!(store.query_count(), 1);

    // re-assigning the unchanged key outside insertion admits the missing member
    uow.set_value(row, "ParentId", 2).unwrap();
    assert_eq!(
        view.members().unwrap(),
        vec![ObjectIdentity::single("Categories", 2)]
    );
}
