//! Products: catalogue items with a unit price and a stock amount

use crate::core::field::FieldValue;
use crate::core::id::RecordId;
use crate::core::record::{Creatable, EntityKind, Record};
use crate::core::update::{
    FieldRule, PartialUpdate, coerce_integer, coerce_positive_decimal, coerce_text,
};
use bson::{Document, doc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub price: f64,
    /// Stock on hand; not touched by order creation
    #[serde(default)]
    pub amount: i32,
}

/// Client payload for `POST /products`
///
/// Any `id` or `amount` in the payload is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[serde(default)]
    #[validate(custom(
        function = "crate::core::extract::not_blank",
        message = "name is required"
    ))]
    pub name: String,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, message = "price must be positive"))]
    pub price: f64,
}

impl Record for Product {
    type Patch = ProductPatch;

    const KIND: EntityKind = EntityKind::Product;
    const SEARCH_FIELD: &'static str = "name";

    fn id(&self) -> RecordId {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Id(self.id)),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "price" => Some(FieldValue::Decimal(self.price)),
            "amount" => Some(FieldValue::Integer(i64::from(self.amount))),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &ProductPatch) -> bool {
        let mut modified = false;
        if let Some(name) = &patch.name {
            modified |= self.name != *name;
            self.name = name.clone();
        }
        if let Some(price) = patch.price {
            modified |= self.price != price;
            self.price = price;
        }
        if let Some(amount) = patch.amount {
            modified |= self.amount != amount;
            self.amount = amount;
        }
        modified
    }
}

impl Creatable for Product {
    type Draft = NewProduct;

    fn from_draft(draft: NewProduct) -> Self {
        Self {
            id: RecordId::new(),
            name: draft.name,
            price: draft.price,
            amount: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductChange {
    Name(String),
    Price(f64),
    Amount(i32),
}

/// Partial update for a product: `name`, `price` and `amount` only
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub amount: Option<i32>,
}

impl PartialUpdate for ProductPatch {
    type Change = ProductChange;

    const ENTITY: EntityKind = EntityKind::Product;

    const RULES: &'static [FieldRule<ProductChange>] = &[
        FieldRule {
            name: "name",
            expected: "non-empty text",
            coerce: |v| coerce_text(v).map(ProductChange::Name),
        },
        FieldRule {
            name: "price",
            expected: "a positive number",
            coerce: |v| coerce_positive_decimal(v).map(ProductChange::Price),
        },
        FieldRule {
            name: "amount",
            expected: "a whole number",
            coerce: |v| coerce_integer(v).map(ProductChange::Amount),
        },
    ];

    fn record(&mut self, change: ProductChange) {
        match change {
            ProductChange::Name(name) => self.name = Some(name),
            ProductChange::Price(price) => self.price = Some(price),
            ProductChange::Amount(amount) => self.amount = Some(amount),
        }
    }

    fn fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("price", self.price.is_some()),
            ("amount", self.amount.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }

    fn set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(name) = &self.name {
            set.insert("name", name.as_str());
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(amount) = self.amount {
            set.insert("amount", amount);
        }
        set
    }
}
