//! Orders: a quantity of one product bought by one customer
//!
//! Orders are only created through [`crate::services::OrderService`], which
//! resolves both references and derives `sum` before persisting. After
//! creation the `status` field is the only mutable attribute.

use crate::core::field::FieldValue;
use crate::core::id::RecordId;
use crate::core::record::{EntityKind, Record};
use crate::core::update::{FieldRule, PartialUpdate, coerce_text};
use bson::{Document, doc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Status assigned at creation
pub const STATUS_PENDING: &str = "pending";

/// Status counted by the delivered-orders report
pub const STATUS_DELIVERED: &str = "delivered";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: RecordId,
    pub amount: i32,
    /// `price × amount` at creation time, never recomputed
    pub sum: f64,
    #[serde(rename = "customerRef", alias = "customer")]
    pub customer_ref: RecordId,
    #[serde(rename = "productRef", alias = "product")]
    pub product_ref: RecordId,
    pub status: String,
}

impl Order {
    pub const CUSTOMER_REF: &'static str = "customerRef";
    pub const PRODUCT_REF: &'static str = "productRef";
}

/// Client payload for `POST /orders`
///
/// Any `id`, `sum` or `status` in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub amount: i32,
    #[serde(default, rename = "customerRef", alias = "customer")]
    pub customer_ref: Option<RecordId>,
    #[serde(default, rename = "productRef", alias = "product")]
    pub product_ref: Option<RecordId>,
}

fn problem(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

// References are optional ids that must also be non-nil, which the derive
// cannot express on `Option<RecordId>`.
impl Validate for NewOrder {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.amount < 1 {
            errors.add("amount", problem("range", "amount must be at least 1"));
        }
        match self.customer_ref {
            None => errors.add(
                Order::CUSTOMER_REF,
                problem("required", "customerRef is required"),
            ),
            Some(id) if id.is_nil() => errors.add(
                Order::CUSTOMER_REF,
                problem("nil_id", "customerRef must not be the nil id"),
            ),
            Some(_) => {}
        }
        match self.product_ref {
            None => errors.add(
                Order::PRODUCT_REF,
                problem("required", "productRef is required"),
            ),
            Some(id) if id.is_nil() => errors.add(
                Order::PRODUCT_REF,
                problem("nil_id", "productRef must not be the nil id"),
            ),
            Some(_) => {}
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Record for Order {
    type Patch = OrderPatch;

    const KIND: EntityKind = EntityKind::Order;
    const SEARCH_FIELD: &'static str = "status";
    const REFERENCE_FIELDS: &'static [&'static str] = &[Order::CUSTOMER_REF, Order::PRODUCT_REF];
    const LEGACY_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("customer", Order::CUSTOMER_REF),
        ("product", Order::PRODUCT_REF),
    ];

    fn id(&self) -> RecordId {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Id(self.id)),
            "amount" => Some(FieldValue::Integer(i64::from(self.amount))),
            "sum" => Some(FieldValue::Decimal(self.sum)),
            Order::CUSTOMER_REF => Some(FieldValue::Id(self.customer_ref)),
            Order::PRODUCT_REF => Some(FieldValue::Id(self.product_ref)),
            "status" => Some(FieldValue::Text(self.status.clone())),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &OrderPatch) -> bool {
        match &patch.status {
            Some(status) if *status != self.status => {
                self.status = status.clone();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    Status(String),
}

/// Partial update for an order: `status` only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<String>,
}

impl PartialUpdate for OrderPatch {
    type Change = OrderChange;

    const ENTITY: EntityKind = EntityKind::Order;

    const RULES: &'static [FieldRule<OrderChange>] = &[FieldRule {
        name: "status",
        expected: "non-empty text",
        coerce: |v| coerce_text(v).map(OrderChange::Status),
    }];

    fn record(&mut self, change: OrderChange) {
        match change {
            OrderChange::Status(status) => self.status = Some(status),
        }
    }

    fn fields(&self) -> Vec<&'static str> {
        self.status.iter().map(|_| "status").collect()
    }

    fn set_document(&self) -> Document {
        match &self.status {
            Some(status) => doc! { "status": status.as_str() },
            None => doc! {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::InputError;
    use crate::core::extract::validate;
    use crate::core::update::guard;
    use serde_json::json;

    const CUSTOMER: &str = "65f1a2b3c4d5e6f708192a3b";
    const PRODUCT: &str = "65f1a2b3c4d5e6f708192a3c";

    #[test]
    fn test_new_order_accepts_legacy_keys() {
        let draft: NewOrder = serde_json::from_value(json!({
            "amount": 3,
            "customer": CUSTOMER,
            "product": PRODUCT,
        }))
        .unwrap();
        assert_eq!(draft.customer_ref, Some(CUSTOMER.parse().unwrap()));
        assert_eq!(draft.product_ref, Some(PRODUCT.parse().unwrap()));
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_new_order_ignores_client_sum_and_status() {
        let draft: NewOrder = serde_json::from_value(json!({
            "amount": 1,
            "customerRef": CUSTOMER,
            "productRef": PRODUCT,
            "sum": 1000000.0,
            "status": "delivered",
        }))
        .unwrap();
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_new_order_validation_problems() {
        let err = validate(&NewOrder::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: amount: amount must be at least 1, \
             customerRef: customerRef is required, productRef: productRef is required"
        );

        let nil = NewOrder {
            amount: 2,
            customer_ref: Some(RecordId::nil()),
            product_ref: Some(PRODUCT.parse().unwrap()),
        };
        let err = validate(&nil).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: customerRef: customerRef must not be the nil id"
        );
    }

    #[test]
    fn test_order_serializes_canonical_reference_keys() {
        let order = Order {
            id: RecordId::new(),
            amount: 3,
            sum: 29.97,
            customer_ref: CUSTOMER.parse().unwrap(),
            product_ref: PRODUCT.parse().unwrap(),
            status: STATUS_PENDING.to_string(),
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customerRef"], CUSTOMER);
        assert_eq!(json["productRef"], PRODUCT);
        assert_eq!(json["status"], "pending");
        assert!(json.get("customer_ref").is_none());
    }

    #[test]
    fn test_only_status_is_mutable() {
        let patch: OrderPatch = guard(json!({"status": "delivered"})).unwrap();
        assert_eq!(patch.fields(), vec!["status"]);
        assert_eq!(patch.set_document(), doc! { "status": "delivered" });

        for key in ["amount", "sum", "customerRef", "productRef", "id"] {
            let err = guard::<OrderPatch>(json!({ key: 1 })).unwrap_err();
            assert!(
                matches!(err, InputError::DisallowedField { ref field, .. } if field == key),
                "{key} should be rejected"
            );
        }
    }
}
