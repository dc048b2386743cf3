//! Typed error handling for the sales backend
//!
//! Every failure a handler can hit maps onto one of four kinds, each with a
//! fixed HTTP status:
//!
//! - [`SalesError::MethodNotAllowed`]: wrong verb for a known path (405)
//! - [`SalesError::BadInput`]: unparsable body, failed field check, malformed
//!   id, disallowed update key, failed coercion (400)
//! - [`SalesError::NotFound`] / [`SalesError::MissingReference`]: well-formed
//!   id with no matching document (404)
//! - [`SalesError::StoreFailure`]: the store round trip itself failed (500)
//!
//! Errors render as a plain-text body. The error is logged when it is turned
//! into a response, so each failure is logged exactly once per request.

use crate::core::id::RecordId;
use crate::core::record::EntityKind;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// The main error type returned by handlers and services
#[derive(Debug, thiserror::Error)]
pub enum SalesError {
    /// Path exists but not for this HTTP method
    #[error("Invalid request method {method} for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Client input rejected before any store mutation
    #[error(transparent)]
    BadInput(#[from] InputError),

    /// Well-formed identifier, no matching document
    #[error("No {entity} found with id {id}")]
    NotFound { entity: EntityKind, id: RecordId },

    /// A referenced customer or product is absent at order creation
    #[error("Referenced {entity} {id} does not exist")]
    MissingReference { entity: EntityKind, id: RecordId },

    /// The store operation itself errored
    #[error("Failed to {operation}")]
    StoreFailure {
        operation: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SalesError {
    /// Wrap a store error with the operation that failed
    pub fn store(operation: impl Into<String>, source: anyhow::Error) -> Self {
        SalesError::StoreFailure {
            operation: operation.into(),
            source,
        }
    }

    pub fn not_found(entity: EntityKind, id: RecordId) -> Self {
        SalesError::NotFound { entity, id }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SalesError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            SalesError::BadInput(_) => StatusCode::BAD_REQUEST,
            SalesError::NotFound { .. } | SalesError::MissingReference { .. } => {
                StatusCode::NOT_FOUND
            }
            SalesError::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SalesError::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            SalesError::BadInput(_) => "BAD_INPUT",
            SalesError::NotFound { .. } => "NOT_FOUND",
            SalesError::MissingReference { .. } => "MISSING_REFERENCE",
            SalesError::StoreFailure { .. } => "STORE_FAILURE",
        }
    }
}

impl IntoResponse for SalesError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            SalesError::StoreFailure { operation, source } => {
                tracing::error!(code = self.error_code(), %operation, error = %source, "{}", self);
            }
            _ => {
                tracing::warn!(code = self.error_code(), status = status.as_u16(), "{}", self);
            }
        }

        (status, self.to_string()).into_response()
    }
}

// =============================================================================
// Input Errors
// =============================================================================

/// Reasons a request was rejected as bad input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// Body could not be parsed into the expected shape
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// One or more field checks failed on a creation payload
    #[error("Validation failed: {}", format_field_errors(.0))]
    InvalidFields(Vec<FieldProblem>),

    /// Path identifier is not a well-formed id
    #[error("Invalid id format: '{value}'")]
    InvalidId { value: String },

    /// Update names a field outside the entity's allow-list
    #[error("Invalid update field '{field}' for {entity}; allowed fields: {allowed}")]
    DisallowedField {
        entity: EntityKind,
        field: String,
        allowed: String,
    },

    /// Update value could not be coerced to the field's declared type
    #[error("Invalid value for '{field}': expected {expected}")]
    InvalidFieldValue {
        field: String,
        expected: &'static str,
    },

    /// Update body names no fields at all
    #[error("Update for {entity} must name at least one field")]
    EmptyUpdate { entity: EntityKind },
}

/// A single failed field check
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProblem {
    pub field: String,
    pub message: String,
}

fn format_field_errors(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(|p| format!("{}: {}", p.field, p.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl InputError {
    pub fn invalid_body(message: impl Into<String>) -> Self {
        InputError::InvalidBody {
            message: message.into(),
        }
    }
}
