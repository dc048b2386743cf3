//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoStore<T>`, an [`EntityStore`] backed by one collection per
//! record type (`products`, `customers`, `orders`).
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Connections
//!
//! [`connect`] builds one process-wide `Client` with a bounded connection
//! pool and pings the server once. Every store clones the resulting
//! `Database` handle; each store call leases a pooled connection from the
//! driver for the length of that round trip.
//!
//! # Storage model
//!
//! Records are serialized to BSON documents. The `id` field is mapped to
//! MongoDB's `_id` convention, and both `_id` and the record's reference
//! fields are stored as native `ObjectId`s rather than hex strings.

use crate::config::StoreConfig;
use crate::core::id::RecordId;
use crate::core::record::Record;
use crate::core::store::{EntityStore, ListFilter, SumPipeline, UpdateOutcome};
use crate::core::update::PartialUpdate;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database, IndexModel};
use std::marker::PhantomData;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Open the shared client pool and return the configured database.
///
/// Fails when the URI does not parse or the server does not answer a ping
/// within the connect timeout.
pub async fn connect(config: &StoreConfig) -> Result<Database> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .with_context(|| format!("Invalid MongoDB URI '{}'", config.uri))?;

    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.max_pool_size = Some(config.pool.max_size);
    options.min_pool_size = Some(config.pool.min_size);
    options.connect_timeout = Some(Duration::from_secs(config.pool.connect_timeout_secs));
    options.server_selection_timeout = Some(Duration::from_secs(config.pool.connect_timeout_secs));

    let client = Client::with_options(options).context("Failed to build MongoDB client")?;
    let database = client.database(&config.database);

    database
        .run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB did not answer ping")?;

    tracing::info!(
        database = %config.database,
        max_pool_size = config.pool.max_size,
        "Connected to MongoDB"
    );

    Ok(database)
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Replace a hex string at `key` with the native `ObjectId`
fn hex_to_object_id(doc: &mut Document, key: &str) -> Result<()> {
    if let Some(Bson::String(hex)) = doc.get(key) {
        let oid = ObjectId::parse_str(hex)
            .map_err(|e| anyhow!("Field '{}' is not an object id: {}", key, e))?;
        doc.insert(key, oid);
    }
    Ok(())
}

/// Replace a native `ObjectId` at `key` with its hex string
fn object_id_to_hex(doc: &mut Document, key: &str) {
    if let Some(Bson::ObjectId(oid)) = doc.get(key) {
        let hex = oid.to_hex();
        doc.insert(key, hex);
    }
}

/// Convert a record into a MongoDB document, renaming `id` → `_id`.
fn record_to_document<T: Record>(record: &T) -> Result<Document> {
    let mut doc = mongodb::bson::to_document(record)
        .map_err(|e| anyhow!("Failed to serialize {}: {}", T::KIND, e))?;

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }
    hex_to_object_id(&mut doc, "_id")?;
    for field in T::REFERENCE_FIELDS {
        hex_to_object_id(&mut doc, field)?;
    }

    Ok(doc)
}

/// Convert a MongoDB document back into a record, renaming `_id` → `id`.
fn document_to_record<T: Record>(mut doc: Document) -> Result<T> {
    for (legacy, current) in T::LEGACY_FIELDS {
        if doc.contains_key(current) {
            continue;
        }
        if let Some(value) = doc.remove(legacy) {
            doc.insert(*current, value);
        }
    }
    object_id_to_hex(&mut doc, "_id");
    for field in T::REFERENCE_FIELDS {
        object_id_to_hex(&mut doc, field);
    }
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    mongodb::bson::from_document(doc)
        .map_err(|e| anyhow!("Failed to deserialize {} from document: {}", T::KIND, e))
}

fn id_filter(id: &RecordId) -> Document {
    doc! { "_id": id.as_object_id() }
}

/// Case-insensitive literal substring match, or everything
fn list_filter(filter: &ListFilter) -> Document {
    match &filter.needle {
        Some(needle) => {
            let field = filter.field;
            let pattern = regex::escape(needle);
            doc! { field: { "$regex": pattern, "$options": "i" } }
        }
        None => doc! {},
    }
}

fn numeric(value: Option<&Bson>) -> Result<f64> {
    match value {
        None | Some(Bson::Null) => Ok(0.0),
        Some(Bson::Double(d)) => Ok(*d),
        Some(Bson::Int32(i)) => Ok(f64::from(*i)),
        Some(Bson::Int64(i)) => Ok(*i as f64),
        Some(other) => Err(anyhow!("Aggregate total is not numeric: {}", other)),
    }
}

// ---------------------------------------------------------------------------
// MongoStore<T>
// ---------------------------------------------------------------------------

/// Record store backed by the MongoDB collection `T::KIND.collection()`.
///
/// # Example
///
/// ```rust,ignore
/// let database = connect(&config.store).await?;
/// let orders = MongoStore::<Order>::new(database.clone());
/// orders.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoStore<T> {
    database: Database,
    _marker: PhantomData<T>,
}

impl<T> MongoStore<T> {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: PhantomData,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Record> MongoStore<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::KIND.collection())
    }

    /// Index the record's search field. Idempotent, safe on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let field = T::SEARCH_FIELD;
        let index = IndexModel::builder().keys(doc! { field: 1 }).build();

        self.collection()
            .create_index(index)
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to create index on {} collection: {}",
                    T::KIND.collection(),
                    e
                )
            })?;

        Ok(())
    }
}

#[async_trait]
impl<T: Record> EntityStore<T> for MongoStore<T> {
    async fn insert(&self, record: T) -> Result<T> {
        let doc = record_to_document(&record)?;
        tracing::debug!(collection = T::KIND.collection(), id = %record.id(), "insert_one");

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to insert {}: {}", T::KIND, e))?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<T>> {
        tracing::debug!(collection = T::KIND.collection(), %id, "find_one");

        let doc = self
            .collection()
            .find_one(id_filter(id))
            .await
            .map_err(|e| anyhow!("Failed to get {}: {}", T::KIND, e))?;

        doc.map(document_to_record).transpose()
    }

    async fn find(&self, filter: &ListFilter) -> Result<Vec<T>> {
        let query = list_filter(filter);
        tracing::debug!(collection = T::KIND.collection(), filter = %query, "find");

        let cursor = self
            .collection()
            .find(query)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| anyhow!("Failed to list {}: {}", T::KIND.collection(), e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", T::KIND.collection(), e))?;

        docs.into_iter().map(document_to_record).collect()
    }

    async fn update_by_id(&self, id: &RecordId, patch: &T::Patch) -> Result<UpdateOutcome> {
        let set = patch.set_document();
        tracing::debug!(collection = T::KIND.collection(), %id, set = %set, "update_one");

        let result = self
            .collection()
            .update_one(id_filter(id), doc! { "$set": set })
            .await
            .map_err(|e| anyhow!("Failed to update {}: {}", T::KIND, e))?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_id(&self, id: &RecordId) -> Result<u64> {
        tracing::debug!(collection = T::KIND.collection(), %id, "delete_one");

        let result = self
            .collection()
            .delete_one(id_filter(id))
            .await
            .map_err(|e| anyhow!("Failed to delete {}: {}", T::KIND, e))?;

        Ok(result.deleted_count)
    }

    async fn aggregate_sum(&self, pipeline: &SumPipeline) -> Result<f64> {
        let stages = pipeline.stages();
        tracing::debug!(collection = T::KIND.collection(), ?stages, "aggregate");

        let mut cursor = self
            .collection()
            .aggregate(stages)
            .await
            .map_err(|e| anyhow!("Failed to aggregate {}: {}", T::KIND.collection(), e))?;

        // The group stage emits no document at all when nothing matched
        match cursor
            .try_next()
            .await
            .map_err(|e| anyhow!("Failed to read aggregate result: {}", e))?
        {
            Some(group) => numeric(group.get(SumPipeline::TOTAL)),
            None => Ok(0.0),
        }
    }
}
