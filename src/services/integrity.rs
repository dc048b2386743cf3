//! Referential integrity for order creation

use crate::core::error::SalesError;
use crate::core::id::RecordId;
use crate::core::record::{EntityKind, Record};
use crate::core::store::EntityStore;
use crate::entities::{Customer, Product};
use std::sync::Arc;

/// Confirms that an order's customer and product exist
///
/// The store has no foreign keys; this check is the only thing standing
/// between an order and a dangling reference. It is not atomic with the
/// insert that follows it, so a concurrent delete can still slip through.
#[derive(Clone)]
pub struct ReferentialIntegrityChecker {
    customers: Arc<dyn EntityStore<Customer>>,
    products: Arc<dyn EntityStore<Product>>,
}

impl ReferentialIntegrityChecker {
    pub fn new(
        customers: Arc<dyn EntityStore<Customer>>,
        products: Arc<dyn EntityStore<Product>>,
    ) -> Self {
        Self {
            customers,
            products,
        }
    }

    /// Check the customer, then the product, and return the product
    ///
    /// Stops at the first missing reference; the product lookup is skipped
    /// entirely when the customer is absent.
    pub async fn resolve(
        &self,
        customer_id: &RecordId,
        product_id: &RecordId,
    ) -> Result<Product, SalesError> {
        ensure_exists(self.customers.as_ref(), customer_id).await?;
        ensure_exists(self.products.as_ref(), product_id).await
    }
}

async fn ensure_exists<T: Record>(
    store: &dyn EntityStore<T>,
    id: &RecordId,
) -> Result<T, SalesError> {
    let kind: EntityKind = T::KIND;
    store
        .find_by_id(id)
        .await
        .map_err(|e| SalesError::store(format!("look up {}", kind), e))?
        .ok_or(SalesError::MissingReference {
            entity: kind,
            id: *id,
        })
}
