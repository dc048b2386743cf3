//! Whitelisted partial updates
//!
//! Every entity declares a table of [`FieldRule`]s: the field names a client
//! may change and how each raw JSON value is coerced into a typed change.
//! [`guard`] checks a request body against that table and builds the typed
//! patch; a single unknown key or failed coercion rejects the whole update.

use crate::core::error::InputError;
use crate::core::record::EntityKind;
use bson::Document;
use serde_json::Value;

/// One whitelisted field: its name, a description of the accepted value,
/// and the coercion that turns a JSON value into a typed change
pub struct FieldRule<C> {
    pub name: &'static str,
    pub expected: &'static str,
    pub coerce: fn(&Value) -> Option<C>,
}

/// A typed partial update with one optional slot per mutable attribute
pub trait PartialUpdate: Default + Send + Sync + 'static {
    /// One variant per mutable attribute
    type Change: 'static;

    const ENTITY: EntityKind;

    /// The allow-list, with a coercion rule per field
    const RULES: &'static [FieldRule<Self::Change>];

    /// Fill the slot for this change
    fn record(&mut self, change: Self::Change);

    /// Names of the filled slots, in table order
    fn fields(&self) -> Vec<&'static str>;

    /// The `$set` body for a document-store update
    fn set_document(&self) -> Document;

    fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}

/// Validate an update body against `P`'s allow-list and build the patch
pub fn guard<P: PartialUpdate>(body: Value) -> Result<P, InputError> {
    let Value::Object(map) = body else {
        return Err(InputError::invalid_body("expected a JSON object"));
    };

    if map.is_empty() {
        return Err(InputError::EmptyUpdate { entity: P::ENTITY });
    }

    // Reject disallowed keys before coercing anything
    let mut matched = Vec::with_capacity(map.len());
    for (key, value) in &map {
        let rule = P::RULES
            .iter()
            .find(|rule| rule.name == key.as_str())
            .ok_or_else(|| InputError::DisallowedField {
                entity: P::ENTITY,
                field: key.clone(),
                allowed: allowed_fields::<P>(),
            })?;
        matched.push((rule, value));
    }

    let mut patch = P::default();
    for (rule, value) in matched {
        let change = (rule.coerce)(value).ok_or(InputError::InvalidFieldValue {
            field: rule.name.to_string(),
            expected: rule.expected,
        })?;
        patch.record(change);
    }

    Ok(patch)
}

fn allowed_fields<P: PartialUpdate>() -> String {
    P::RULES
        .iter()
        .map(|rule| rule.name)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Coercions
// =============================================================================

/// Non-empty text after trimming
pub fn coerce_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Finite, strictly positive number
pub fn coerce_positive_decimal(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite() && *n > 0.0)
}

/// Whole number that fits in 32 bits; `3.0` is accepted, `3.5` is not
pub fn coerce_integer(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }

    let n = value.as_f64()?;
    if n.fract() != 0.0 || n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
        return None;
    }
    Some(n as i32)
}
