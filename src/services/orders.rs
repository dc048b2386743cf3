//! Order creation workflow
//!
//! validate → resolve customer and product → compute sum → insert.
//! Each step is its own store round trip; there is no transaction around
//! them.

use crate::core::error::{InputError, SalesError};
use crate::core::extract::validate;
use crate::core::id::RecordId;
use crate::core::store::EntityStore;
use crate::entities::{NewOrder, Order, STATUS_PENDING};
use crate::services::integrity::ReferentialIntegrityChecker;
use std::sync::Arc;

/// An order request that passed validation: both references are present
/// and non-nil, and `amount >= 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderCandidate {
    pub amount: i32,
    pub customer_ref: RecordId,
    pub product_ref: RecordId,
}

impl TryFrom<NewOrder> for OrderCandidate {
    type Error = InputError;

    fn try_from(draft: NewOrder) -> Result<Self, Self::Error> {
        validate(&draft)?;
        match (draft.customer_ref, draft.product_ref) {
            (Some(customer_ref), Some(product_ref)) => Ok(Self {
                amount: draft.amount,
                customer_ref,
                product_ref,
            }),
            // validate() already rejected missing references
            _ => Err(InputError::invalid_body("order references are missing")),
        }
    }
}

/// Derives an order's total and initial status
pub struct OrderComputation;

impl OrderComputation {
    /// `price × amount` in native floating point, no rounding
    pub fn compute_sum(price: f64, amount: i32) -> f64 {
        price * f64::from(amount)
    }

    /// Build the order to persist under `id`, with status `pending`
    pub fn finalize(candidate: &OrderCandidate, price: f64, id: RecordId) -> Order {
        Order {
            id,
            amount: candidate.amount,
            sum: Self::compute_sum(price, candidate.amount),
            customer_ref: candidate.customer_ref,
            product_ref: candidate.product_ref,
            status: STATUS_PENDING.to_string(),
        }
    }
}

/// Creates orders after checking their references
#[derive(Clone)]
pub struct OrderService {
    integrity: ReferentialIntegrityChecker,
    orders: Arc<dyn EntityStore<Order>>,
}

impl OrderService {
    pub fn new(integrity: ReferentialIntegrityChecker, orders: Arc<dyn EntityStore<Order>>) -> Self {
        Self { integrity, orders }
    }

    /// Persist a new order; nothing is written when a reference is missing
    ///
    /// The reference lookups and the insert are separate round trips. A
    /// customer or product deleted in between still ends up referenced.
    pub async fn create(&self, candidate: OrderCandidate) -> Result<Order, SalesError> {
        let product = self
            .integrity
            .resolve(&candidate.customer_ref, &candidate.product_ref)
            .await?;

        let order = OrderComputation::finalize(&candidate, product.price, RecordId::new());

        let order = self
            .orders
            .insert(order)
            .await
            .map_err(|e| SalesError::store("insert order", e))?;

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_ref,
            product_id = %order.product_ref,
            sum = order.sum,
            "Order created"
        );

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::EntityKind;
    use crate::core::store::ListFilter;
    use crate::entities::{Customer, Product};
    use crate::storage::InMemoryStore;

    #[test]
    fn test_compute_sum() {
        assert_eq!(OrderComputation::compute_sum(9.99, 3), 29.97);
        assert_eq!(OrderComputation::compute_sum(2.5, 4), 10.0);
    }

    #[test]
    fn test_finalize_is_pending() {
        let candidate = OrderCandidate {
            amount: 2,
            customer_ref: RecordId::new(),
            product_ref: RecordId::new(),
        };
        let id = RecordId::new();
        let order = OrderComputation::finalize(&candidate, 4.25, id);
        assert_eq!(order.id, id);
        assert_eq!(order.sum, 8.5);
        assert_eq!(order.status, "pending");
        assert_eq!(order.customer_ref, candidate.customer_ref);
    }

    #[test]
    fn test_candidate_requires_valid_draft() {
        let err = OrderCandidate::try_from(NewOrder {
            amount: 0,
            customer_ref: Some(RecordId::new()),
            product_ref: Some(RecordId::new()),
        })
        .unwrap_err();
        assert!(matches!(err, InputError::InvalidFields(_)));
    }

    struct Fixture {
        service: OrderService,
        orders: InMemoryStore<Order>,
        customer: Customer,
        product: Product,
    }

    async fn fixture() -> Fixture {
        let customers = InMemoryStore::<Customer>::new();
        let products = InMemoryStore::<Product>::new();
        let orders = InMemoryStore::<Order>::new();

        let customer = customers
            .insert(Customer {
                id: RecordId::new(),
                name: "Ada".into(),
                address: "London".into(),
            })
            .await
            .unwrap();
        let product = products
            .insert(Product {
                id: RecordId::new(),
                name: "Widget".into(),
                price: 9.99,
                amount: 0,
            })
            .await
            .unwrap();

        let integrity =
            ReferentialIntegrityChecker::new(Arc::new(customers), Arc::new(products));
        let service = OrderService::new(integrity, Arc::new(orders.clone()));

        Fixture {
            service,
            orders,
            customer,
            product,
        }
    }

    #[tokio::test]
    async fn test_create_order() {
        let f = fixture().await;
        let order = f
            .service
            .create(OrderCandidate {
                amount: 3,
                customer_ref: f.customer.id,
                product_ref: f.product.id,
            })
            .await
            .unwrap();

        assert_eq!(order.sum, 29.97);
        assert_eq!(order.status, STATUS_PENDING);
        assert_eq!(
            f.orders.find(&ListFilter::all::<Order>()).await.unwrap(),
            vec![order]
        );
    }

    #[tokio::test]
    async fn test_missing_reference_persists_nothing() {
        let f = fixture().await;
        let err = f
            .service
            .create(OrderCandidate {
                amount: 1,
                customer_ref: f.customer.id,
                product_ref: RecordId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SalesError::MissingReference { entity: EntityKind::Product, .. }
        ));
        assert!(f.orders.is_empty());
    }
}
