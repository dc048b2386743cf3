//! Generic CRUD handlers shared by products, customers and orders

use crate::core::error::SalesError;
use crate::core::extract::{IdPath, JsonBody, Validated};
use crate::core::id::RecordId;
use crate::core::record::{Creatable, Record};
use crate::core::store::ListFilter;
use crate::core::update::{PartialUpdate, guard};
use crate::server::host::{AppState, StoreFor};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Body of a successful partial update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateReport {
    pub id: RecordId,
    /// Sorted names of the fields that were set
    pub fields: Vec<&'static str>,
    /// False when every submitted value already matched the stored one
    pub modified: bool,
}

/// Body of a successful delete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteReport {
    pub id: RecordId,
    pub deleted: bool,
}

/// `POST /{collection}` for records created straight from their draft
pub async fn create<T>(
    State(state): State<AppState>,
    Validated(draft): Validated<T::Draft>,
) -> Result<(StatusCode, Json<T>), SalesError>
where
    T: Creatable,
    AppState: StoreFor<T>,
{
    let record = T::from_draft(draft);
    let record = StoreFor::<T>::store(&state)
        .insert(record)
        .await
        .map_err(|e| SalesError::store(format!("create {}", T::KIND), e))?;

    tracing::info!(entity = %T::KIND, id = %record.id(), "Created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /{collection}` with an optional filter on the search field
pub async fn list<T>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<T>>, SalesError>
where
    T: Record,
    AppState: StoreFor<T>,
{
    let filter = match params.get(T::SEARCH_FIELD) {
        Some(needle) => ListFilter::containing::<T>(needle.as_str()),
        None => ListFilter::all::<T>(),
    };

    let records = StoreFor::<T>::store(&state)
        .find(&filter)
        .await
        .map_err(|e| SalesError::store(format!("list {}", T::KIND.collection()), e))?;

    Ok(Json(records))
}

/// `GET /{collection}/{id}`
pub async fn get_one<T>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<T>, SalesError>
where
    T: Record,
    AppState: StoreFor<T>,
{
    StoreFor::<T>::store(&state)
        .find_by_id(&id)
        .await
        .map_err(|e| SalesError::store(format!("get {}", T::KIND), e))?
        .map(Json)
        .ok_or(SalesError::not_found(T::KIND, id))
}

/// `PUT /{collection}/{id}` with a partial, whitelisted body
pub async fn update<T>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<UpdateReport>, SalesError>
where
    T: Record,
    AppState: StoreFor<T>,
{
    let patch: T::Patch = guard(body)?;

    let outcome = StoreFor::<T>::store(&state)
        .update_by_id(&id, &patch)
        .await
        .map_err(|e| SalesError::store(format!("update {}", T::KIND), e))?;

    if outcome.matched == 0 {
        return Err(SalesError::not_found(T::KIND, id));
    }

    let mut fields = patch.fields();
    fields.sort_unstable();

    tracing::info!(entity = %T::KIND, %id, ?fields, modified = outcome.modified, "Updated");
    Ok(Json(UpdateReport {
        id,
        fields,
        modified: outcome.modified > 0,
    }))
}

/// `DELETE /{collection}/{id}`
pub async fn delete<T>(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<DeleteReport>, SalesError>
where
    T: Record,
    AppState: StoreFor<T>,
{
    let deleted = StoreFor::<T>::store(&state)
        .delete_by_id(&id)
        .await
        .map_err(|e| SalesError::store(format!("delete {}", T::KIND), e))?;

    if deleted == 0 {
        return Err(SalesError::not_found(T::KIND, id));
    }

    tracing::info!(entity = %T::KIND, %id, "Deleted");
    Ok(Json(DeleteReport { id, deleted: true }))
}
