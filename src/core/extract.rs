//! Axum extractors for request bodies and path identifiers
//!
//! All rejections are turned into [`SalesError::BadInput`] so that a
//! malformed body, a failed field check and a malformed id all answer
//! 400 with a plain-text message.

use crate::core::error::{FieldProblem, InputError, SalesError};
use crate::core::id::RecordId;
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

/// JSON body whose parse failures become `BadInput`
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = SalesError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(InputError::invalid_body(rejection.body_text()).into()),
        }
    }
}

/// JSON body that was parsed and then passed its `validator` checks
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_customer(
///     Validated(draft): Validated<NewCustomer>,
/// ) -> Result<Json<Customer>, SalesError> {
///     // draft.name and draft.address are non-empty here
/// }
/// ```
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = SalesError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        validate(&value)?;
        Ok(Validated(value))
    }
}

/// Run `validator` checks, flattening failures into one `InputError`
pub fn validate<T: Validate>(value: &T) -> Result<(), InputError> {
    value.validate().map_err(field_problems)
}

/// `validator` custom check: text with something besides whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn field_problems(errors: ValidationErrors) -> InputError {
    let mut problems: Vec<FieldProblem> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldProblem {
                field: field.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect();

    problems.sort_by(|a, b| a.field.cmp(&b.field));
    InputError::InvalidFields(problems)
}

/// Record id taken from the `{id}` path segment
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub RecordId);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = SalesError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| InputError::invalid_body(rejection.body_text()))?;

        raw.parse::<RecordId>()
            .map(IdPath)
            .map_err(|_| InputError::InvalidId { value: raw }.into())
    }
}
