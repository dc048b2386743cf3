//! Record traits shared by products, customers and orders

use crate::core::field::FieldValue;
use crate::core::id::RecordId;
use crate::core::update::PartialUpdate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use validator::Validate;

/// The three resource types of the sales backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Customer,
    Order,
}

impl EntityKind {
    /// Collection name in the document store, also the REST path segment
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Product => "products",
            EntityKind::Customer => "customers",
            EntityKind::Order => "orders",
        }
    }

    /// Singular, lowercase name used in messages
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Customer => "customer",
            EntityKind::Order => "order",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

/// A document persisted in its own collection
///
/// Implementations describe which collection they live in, how their
/// identifier and fields are read, and which partial update they accept.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Whitelisted partial update for this record type
    type Patch: PartialUpdate;

    const KIND: EntityKind;

    /// Field matched by the optional case-insensitive list filter
    const SEARCH_FIELD: &'static str;

    /// Fields holding references to other records, stored as native ids
    const REFERENCE_FIELDS: &'static [&'static str] = &[];

    /// Older stored key names, as `(legacy, current)` pairs, renamed on read
    const LEGACY_FIELDS: &'static [(&'static str, &'static str)] = &[];

    fn id(&self) -> RecordId;

    /// Read a field by its serialized name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Apply a validated patch in place, returning whether anything changed
    fn apply_patch(&mut self, patch: &Self::Patch) -> bool;
}

/// A record created directly from a validated client draft
///
/// Orders are not `Creatable`: their creation runs the integrity checks in
/// [`crate::services::OrderService`].
pub trait Creatable: Record {
    type Draft: DeserializeOwned + Validate + Send;

    /// Build the record, assigning a fresh id
    fn from_draft(draft: Self::Draft) -> Self;
}
