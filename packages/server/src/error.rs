//! API Error Mapping
//!
//! Maps engine outcomes onto transport responses:
//!
//! - `UserNotFound` -> 404
//! - `UsernameTaken` -> 409
//! - `SelfFollow`, validation failures -> 400
//! - store failures -> 500 (logged, details withheld from the response)
//!
//! Every error body has the same `{ "error": ..., "detail": ... }` shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flock_core::models::ValidationError;
use flock_core::services::ServiceError;
use serde::Serialize;

/// Standard error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    detail: Option<String>,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            detail: Some("Not authenticated".to_string()),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            error: "forbidden",
            detail: Some(detail.into()),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "not_found",
            detail: Some(detail.into()),
        }
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            error: "conflict",
            detail: Some(detail.into()),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "bad_request",
            detail: Some(detail.into()),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal_error",
            detail: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error.to_string(),
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::UserNotFound { .. } => Self::not_found("Profile not found"),
            ServiceError::UsernameTaken { .. } => Self::conflict("Username is already taken"),
            ServiceError::SelfFollow => Self::bad_request("Cannot follow yourself"),
            ServiceError::Validation(e) => Self::from(e),
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "graph store failure");
                Self::internal()
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "validation_error",
            detail: Some(err.to_string()),
        }
    }
}
