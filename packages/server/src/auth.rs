//! Caller Identity
//!
//! Token verification against the identity provider happens at the edge
//! (gateway/middleware), which forwards the verified identity as plain
//! headers. This extractor only reads those headers; the engine never
//! learns how the identity was verified.
//!
//! Requests without an identity header are rejected with 401 before any
//! handler runs.

use crate::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the verified identity-provider user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the verified email, if the provider supplied one.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated caller, as verified by the edge authenticator.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: String,
    pub email: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(ApiError::unauthorized)?
            .to_string();

        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Caller { id, email })
    }
}
