#![allow(dead_code)]

use std::cell::RefCell;

use tessera::prelude::*;

/// Customer 1-* Order 1-* OrderLine
///
/// `Order.Total` opts out of optimistic lock matching, `OrderLine.Product`
/// matches with LIKE.
pub fn shop_model() -> Model {
    Model::new()
        .with(
            EntityMetadata::new("Customer", "Customers")
                .column(ColumnMetadata::new("Id").primary_key().generated())
                .column(ColumnMetadata::new("Name").property("name"))
                .relation(RelationDescriptor::one_to_many(
                    "orders",
                    "Customer",
                    "Id",
                    "Order",
                    "CustomerId",
                )),
        )
        .with(
            EntityMetadata::new("Order", "Orders")
                .column(ColumnMetadata::new("Id").primary_key().generated())
                .column(ColumnMetadata::new("CustomerId").property("customerId"))
                .column(ColumnMetadata::new("Note").property("note"))
                .column(ColumnMetadata::new("Total").property("total").lock("none"))
                .relation(RelationDescriptor::one_to_many(
                    "lines",
                    "Order",
                    "Id",
                    "OrderLine",
                    "OrderId",
                ))
                .relation(RelationDescriptor::one_to_many(
                    "customer",
                    "Customer",
                    "Id",
                    "Order",
                    "CustomerId",
                )),
        )
        .with(
            EntityMetadata::new("OrderLine", "OrderLines")
                .column(ColumnMetadata::new("Id").primary_key())
                .column(ColumnMetadata::new("OrderId").property("orderId"))
                .column(ColumnMetadata::new("Product").property("product").lock("like"))
                .column(ColumnMetadata::new("Quantity").property("quantity"))
                .relation(RelationDescriptor::one_to_many(
                    "order",
                    "Order",
                    "Id",
                    "OrderLine",
                    "OrderId",
                )),
        )
}

/// An in-memory backing store that answers single-column equality fetches and
/// records every command it receives.
pub struct StoreRows {
    model: Model,
    rows: RefCell<Vec<(String, Vec<Value>)>>,
    queries: RefCell<Vec<String>>,
}

impl StoreRows {
    pub fn new(model: &Model) -> Self {
        Self {
            model: model.clone(),
            rows: RefCell::new(Vec::new()),
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn put(&self, entity: &str, values: Vec<Value>) {
        self.rows.borrow_mut().push((entity.to_owned(), values));
    }

    /// Number of fetches executed so far.
    pub fn query_count(&self) -> usize {
        self.queries.borrow().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl RowSource for StoreRows {
    fn fetch(
        &self,
        command: &CompiledCommand,
        spec: &FetchSpecification,
    ) -> tessera::Result<Vec<Vec<Value>>> {
        self.queries.borrow_mut().push(command.sql().to_owned());
        let entity = self.model.entity(spec.entity())?;
        let filter = match spec.qualifier() {
            None => None,
            Some(Qualifier::Column { column, predicate })
                if predicate.kind() == PredicateKind::Equals =>
            {
                Some((entity.column_index(column)?, predicate.value().clone()))
            }
            Some(other) => {
                return Err(TesseraError::Store(format!(
                    "unsupported qualifier {other:?}"
                )));
            }
        };

        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|(name, _)| name == entity.name())
            .filter(|(_, values)| {
                filter
                    .as_ref()
                    .map_or(true, |(idx, value)| values[*idx] == *value)
            })
            .map(|(_, values)| values.clone())
            .collect())
    }
}
