//! Mapping store failures onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use patient_records_core::{StoreError, ValidationError};
use serde_json::{json, Value};
use tokio::task::JoinError;
use tracing::error;

/// An error response: a status code and a `detail` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: Value,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: Value::from(message),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: Value::from(message),
        }
    }

    /// 422 listing every field that failed validation.
    pub fn unprocessable(err: &ValidationError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: json!(err.violations()),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Value::from("Internal server error"),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::not_found("Patient not found"),
            StoreError::AlreadyExists(_) => ApiError::bad_request("Patient already exists"),
            StoreError::InvalidArgument(message) => ApiError::bad_request(&message),
            StoreError::Validation(e) => ApiError::unprocessable(&e),
            other => {
                error!(error = %other, "patient store failure");
                ApiError::internal()
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::unprocessable(&err)
    }
}

/// Bodies that are not a JSON object at all keep axum's status (400 for bad
/// syntax, 415 for a missing content type) but get the usual `detail` shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: Value::from(rejection.body_text()),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        error!(error = %err, "store task failed");
        ApiError::internal()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}
