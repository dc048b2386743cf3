//! Application state shared by every handler
//!
//! `AppState` holds one store per record type. It is cheap to clone: each
//! store is behind an `Arc`, and for MongoDB every store shares the same
//! pooled client.

use crate::core::record::Record;
use crate::core::store::EntityStore;
use crate::entities::{Customer, Order, Product};
use crate::services::{AggregationReporter, OrderService, ReferentialIntegrityChecker};
use crate::storage::InMemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn EntityStore<Product>>,
    pub customers: Arc<dyn EntityStore<Customer>>,
    pub orders: Arc<dyn EntityStore<Order>>,
}

impl AppState {
    pub fn new(
        products: Arc<dyn EntityStore<Product>>,
        customers: Arc<dyn EntityStore<Customer>>,
        orders: Arc<dyn EntityStore<Order>>,
    ) -> Self {
        Self {
            products,
            customers,
            orders,
        }
    }

    /// State backed by fresh, empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::<Product>::new()),
            Arc::new(InMemoryStore::<Customer>::new()),
            Arc::new(InMemoryStore::<Order>::new()),
        )
    }

    pub fn order_service(&self) -> OrderService {
        let integrity =
            ReferentialIntegrityChecker::new(self.customers.clone(), self.products.clone());
        OrderService::new(integrity, self.orders.clone())
    }

    pub fn reporter(&self) -> AggregationReporter {
        AggregationReporter::new(self.orders.clone())
    }
}

/// Access to the store holding records of type `T`
pub trait StoreFor<T: Record> {
    fn store(&self) -> Arc<dyn EntityStore<T>>;
}

impl StoreFor<Product> for AppState {
    fn store(&self) -> Arc<dyn EntityStore<Product>> {
        self.products.clone()
    }
}

impl StoreFor<Customer> for AppState {
    fn store(&self) -> Arc<dyn EntityStore<Customer>> {
        self.customers.clone()
    }
}

impl StoreFor<Order> for AppState {
    fn store(&self) -> Arc<dyn EntityStore<Order>> {
        self.orders.clone()
    }
}
