//! Domain services that coordinate more than one store
//!
//! - [`ReferentialIntegrityChecker`] resolves an order's customer and product
//! - [`OrderComputation`] derives `sum` and the initial status
//! - [`OrderService`] runs the full order creation workflow
//! - [`AggregationReporter`] sums delivered orders

pub mod integrity;
pub mod orders;
pub mod reporting;

pub use integrity::ReferentialIntegrityChecker;
pub use orders::{OrderCandidate, OrderComputation, OrderService};
pub use reporting::{AggregationReporter, DeliveredTotal};
