//! # sales
//!
//! A sales-management backend exposing products, customers and orders as a
//! REST API over a document store.
//!
//! ## Features
//!
//! - **Order workflow**: orders are checked against existing customers and
//!   products, and their `sum` is derived from the product price at creation
//! - **Whitelisted partial updates**: each resource declares which fields a
//!   client may change and how each value is coerced
//! - **Delivered revenue report**: a two-stage filter-and-sum aggregation
//! - **Pluggable storage**: in-memory, or MongoDB behind the
//!   `mongodb_backend` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sales::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_products(InMemoryStore::<Product>::new())
//!         .with_customers(InMemoryStore::<Customer>::new())
//!         .with_orders(InMemoryStore::<Order>::new())
//!         .serve("127.0.0.1:8080")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Creatable, EntityKind, EntityStore, FieldValue, InputError, ListFilter, PartialUpdate,
        Record, RecordId, SalesError, SumPipeline, UpdateOutcome,
    };

    // === Entities ===
    pub use crate::entities::{
        Customer, CustomerPatch, NewCustomer, NewOrder, NewProduct, Order, OrderPatch, Product,
        ProductPatch, STATUS_DELIVERED, STATUS_PENDING,
    };

    // === Services ===
    pub use crate::services::{
        AggregationReporter, DeliveredTotal, OrderCandidate, OrderComputation, OrderService,
        ReferentialIntegrityChecker,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;

    // === Config ===
    pub use crate::config::{SalesConfig, StoreBackend};

    // === Server ===
    pub use crate::server::{AppState, RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
