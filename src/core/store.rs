//! Store trait for document persistence
//!
//! The trait is agnostic to the backend: the in-memory store and the
//! MongoDB store both implement it. Each method is a single round trip;
//! no multi-document transactions are assumed.

use crate::core::id::RecordId;
use crate::core::record::Record;
use anyhow::Result;
use async_trait::async_trait;
use bson::{Document, doc};

/// Optional case-insensitive substring filter on a record's search field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub field: &'static str,
    pub needle: Option<String>,
}

impl ListFilter {
    /// Match everything
    pub fn all<T: Record>() -> Self {
        Self {
            field: T::SEARCH_FIELD,
            needle: None,
        }
    }

    /// Match records whose search field contains `needle`, ignoring case.
    /// An empty needle matches everything.
    pub fn containing<T: Record>(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        Self {
            field: T::SEARCH_FIELD,
            needle: (!needle.is_empty()).then_some(needle),
        }
    }
}

/// Outcome of a single-document update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents matched by id (0 or 1)
    pub matched: u64,
    /// Documents whose stored values actually changed
    pub modified: u64,
}

/// A two-stage aggregation: filter on one text field, sum another
#[derive(Debug, Clone, PartialEq)]
pub struct SumPipeline {
    pub match_field: &'static str,
    pub match_value: String,
    pub sum_field: &'static str,
}

impl SumPipeline {
    /// Name of the accumulator in the group stage
    pub const TOTAL: &'static str = "total";

    /// Render as document-store pipeline stages
    pub fn stages(&self) -> Vec<Document> {
        let match_field = self.match_field;
        let match_value = self.match_value.as_str();
        let total = Self::TOTAL;
        let sum_path = format!("${}", self.sum_field);

        vec![
            doc! { "$match": { match_field: match_value } },
            doc! { "$group": { "_id": null, total: { "$sum": sum_path } } },
        ]
    }
}

/// Persistence operations for one record type
#[async_trait]
pub trait EntityStore<T: Record>: Send + Sync {
    /// Insert a new record
    async fn insert(&self, record: T) -> Result<T>;

    /// Get a record by id
    async fn find_by_id(&self, id: &RecordId) -> Result<Option<T>>;

    /// List records, optionally filtered
    async fn find(&self, filter: &ListFilter) -> Result<Vec<T>>;

    /// Set the patched fields on the record with this id
    async fn update_by_id(&self, id: &RecordId, patch: &T::Patch) -> Result<UpdateOutcome>;

    /// Delete by id, returning the number of removed documents
    async fn delete_by_id(&self, id: &RecordId) -> Result<u64>;

    /// Run a filter-then-sum pipeline; zero matches sum to `0.0`
    async fn aggregate_sum(&self, pipeline: &SumPipeline) -> Result<f64>;
}
