//! Customers

use crate::core::field::FieldValue;
use crate::core::id::RecordId;
use crate::core::record::{Creatable, EntityKind, Record};
use crate::core::update::{FieldRule, PartialUpdate, coerce_text};
use bson::{Document, doc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub address: String,
}

/// Client payload for `POST /customers`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCustomer {
    #[serde(default)]
    #[validate(custom(
        function = "crate::core::extract::not_blank",
        message = "name is required"
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(
        function = "crate::core::extract::not_blank",
        message = "address is required"
    ))]
    pub address: String,
}

impl Record for Customer {
    type Patch = CustomerPatch;

    const KIND: EntityKind = EntityKind::Customer;
    const SEARCH_FIELD: &'static str = "name";

    fn id(&self) -> RecordId {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Id(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "address" => Some(FieldValue::Text(self.address.clone())),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &CustomerPatch) -> bool {
        let mut modified = false;
        if let Some(name) = &patch.name {
            modified |= self.name != *name;
            self.name = name.clone();
        }
        if let Some(address) = &patch.address {
            modified |= self.address != *address;
            self.address = address.clone();
        }
        modified
    }
}

impl Creatable for Customer {
    type Draft = NewCustomer;

    fn from_draft(draft: NewCustomer) -> Self {
        Self {
            id: RecordId::new(),
            name: draft.name,
            address: draft.address,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerChange {
    Name(String),
    Address(String),
}

/// Partial update for a customer: `name` and `address` only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl PartialUpdate for CustomerPatch {
    type Change = CustomerChange;

    const ENTITY: EntityKind = EntityKind::Customer;

    const RULES: &'static [FieldRule<CustomerChange>] = &[
        FieldRule {
            name: "name",
            expected: "non-empty text",
            coerce: |v| coerce_text(v).map(CustomerChange::Name),
        },
        FieldRule {
            name: "address",
            expected: "non-empty text",
            coerce: |v| coerce_text(v).map(CustomerChange::Address),
        },
    ];

    fn record(&mut self, change: CustomerChange) {
        match change {
            CustomerChange::Name(name) => self.name = Some(name),
            CustomerChange::Address(address) => self.address = Some(address),
        }
    }

    fn fields(&self) -> Vec<&'static str> {
        [("name", self.name.is_some()), ("address", self.address.is_some())]
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }

    fn set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(address) = &self.address {
            set.insert("address", address.as_str());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::InputError;
    use crate::core::extract::validate;
    use crate::core::update::guard;
    use serde_json::json;

    #[test]
    fn test_draft_requires_name_and_address() {
        let draft: NewCustomer = serde_json::from_value(json!({"name": "Ada"})).unwrap();
        let err = validate(&draft).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: address: address is required");
    }

    #[test]
    fn test_patch_rejects_unknown_field() {
        let err = guard::<CustomerPatch>(json!({"email": "ada@example.com"})).unwrap_err();
        assert_eq!(
            err,
            InputError::DisallowedField {
                entity: EntityKind::Customer,
                field: "email".to_string(),
                allowed: "name, address".to_string(),
            }
        );
    }

    #[test]
    fn test_patch_moves_customer() {
        let mut customer = Customer::from_draft(NewCustomer {
            name: "Ada".into(),
            address: "12 Analytical Row".into(),
        });
        let patch: CustomerPatch = guard(json!({"address": "1 Engine Lane"})).unwrap();
        assert_eq!(patch.set_document(), doc! { "address": "1 Engine Lane" });
        assert!(customer.apply_patch(&patch));
        assert_eq!(customer.address, "1 Engine Lane");
        assert_eq!(customer.name, "Ada");
    }
}
