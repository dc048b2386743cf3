//! Delivered-orders revenue report

use crate::core::error::SalesError;
use crate::core::store::{EntityStore, SumPipeline};
use crate::entities::{Order, STATUS_DELIVERED};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Response body of `GET /orders/delivered/sum`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeliveredTotal {
    #[serde(rename = "totalSum", serialize_with = "serialize_number")]
    pub total_sum: f64,
}

/// Whole totals are written without a fraction (`0`, not `0.0`)
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Sums the `sum` of every order whose status is exactly `delivered`
#[derive(Clone)]
pub struct AggregationReporter {
    orders: Arc<dyn EntityStore<Order>>,
}

impl AggregationReporter {
    pub fn new(orders: Arc<dyn EntityStore<Order>>) -> Self {
        Self { orders }
    }

    pub fn delivered_pipeline() -> SumPipeline {
        SumPipeline {
            match_field: "status",
            match_value: STATUS_DELIVERED.to_string(),
            sum_field: "sum",
        }
    }

    /// Read-only; `0` when no order is delivered
    pub async fn delivered_total(&self) -> Result<DeliveredTotal, SalesError> {
        let total_sum = self
            .orders
            .aggregate_sum(&Self::delivered_pipeline())
            .await
            .map_err(|e| SalesError::store("sum delivered orders", e))?;

        tracing::debug!(total_sum, "Delivered orders total");
        Ok(DeliveredTotal { total_sum })
    }
}
