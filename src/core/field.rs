//! Field values exposed by records for filtering and aggregation

use crate::core::id::RecordId;

/// A polymorphic field value read from a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Id(RecordId),
}

impl FieldValue {
    /// Get the value as text if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a number; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Case-insensitive substring match on text values
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.as_text()
            .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase()))
    }
}
