//! In-memory implementation of EntityStore for testing and development

use crate::core::id::RecordId;
use crate::core::record::Record;
use crate::core::store::{EntityStore, ListFilter, SumPipeline, UpdateOutcome};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory store for one record type
///
/// Uses RwLock for thread-safe access. Listing returns records in id order,
/// which for generated ids is creation order.
#[derive(Clone)]
pub struct InMemoryStore<T: Record> {
    records: Arc<RwLock<HashMap<RecordId, T>>>,
}

impl<T: Record> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn matches<T: Record>(record: &T, filter: &ListFilter) -> bool {
    match &filter.needle {
        None => true,
        Some(needle) => record
            .field_value(filter.field)
            .is_some_and(|value| value.contains_ignore_case(needle)),
    }
}

#[async_trait]
impl<T: Record> EntityStore<T> for InMemoryStore<T> {
    async fn insert(&self, record: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = record.id();
        if records.contains_key(&id) {
            return Err(anyhow!("Duplicate {} id {}", T::KIND, id));
        }
        records.insert(id, record.clone());

        Ok(record)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn find(&self, filter: &ListFilter) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut found: Vec<T> = records
            .values()
            .filter(|record| matches(*record, filter))
            .cloned()
            .collect();
        found.sort_by_key(|record| record.id());

        Ok(found)
    }

    async fn update_by_id(&self, id: &RecordId, patch: &T::Patch) -> Result<UpdateOutcome> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(match records.get_mut(id) {
            Some(record) => UpdateOutcome {
                matched: 1,
                modified: u64::from(record.apply_patch(patch)),
            },
            None => UpdateOutcome {
                matched: 0,
                modified: 0,
            },
        })
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<u64> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(u64::from(records.remove(id).is_some()))
    }

    async fn aggregate_sum(&self, pipeline: &SumPipeline) -> Result<f64> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .values()
            .filter(|record| {
                record
                    .field_value(pipeline.match_field)
                    .is_some_and(|v| v.as_text() == Some(pipeline.match_value.as_str()))
            })
            .filter_map(|record| record.field_value(pipeline.sum_field))
            .filter_map(|v| v.as_f64())
            .sum())
    }
}
