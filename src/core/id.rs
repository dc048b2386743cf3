//! Record identifiers
//!
//! Every record is addressed by a 12-byte document-store object id. On the
//! wire it travels as its 24-character hexadecimal form; in MongoDB it is
//! stored as a native `ObjectId`.

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// System-assigned, immutable identifier of a product, customer or order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// The all-zero identifier, never assigned to a record
    pub fn nil() -> Self {
        Self(ObjectId::from_bytes([0; 12]))
    }

    pub fn is_nil(&self) -> bool {
        self.0.bytes() == [0; 12]
    }

    /// Canonical lowercase hexadecimal form
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<RecordId> for ObjectId {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Error returned when a string is not a 24-character hexadecimal id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record id '{value}'")]
pub struct ParseRecordIdError {
    pub value: String,
}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| ParseRecordIdError {
                value: s.to_string(),
            })
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
