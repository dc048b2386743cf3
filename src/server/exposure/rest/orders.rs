//! Order-specific handlers: creation with integrity checks, and the report

use crate::core::error::SalesError;
use crate::core::extract::JsonBody;
use crate::entities::{NewOrder, Order};
use crate::server::host::AppState;
use crate::services::{DeliveredTotal, OrderCandidate};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

/// `POST /orders`
pub async fn create_order(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<NewOrder>,
) -> Result<(StatusCode, Json<Order>), SalesError> {
    let candidate = OrderCandidate::try_from(draft)?;
    let order = state.order_service().create(candidate).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders/delivered/sum`
pub async fn delivered_sum(
    State(state): State<AppState>,
) -> Result<Json<DeliveredTotal>, SalesError> {
    state.reporter().delivered_total().await.map(Json)
}
