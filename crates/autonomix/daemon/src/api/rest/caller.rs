//! Caller identity extraction
//!
//! Mutating routes take the calling principal from the `X-Caller` header.
//! The daemon trusts the header as given; deployments that need real
//! authentication put an authenticating proxy in front of it.

use crate::error::ApiError;
use autonomix_types::Principal;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Header carrying the calling principal
pub const CALLER_HEADER: &str = "x-caller";

/// The principal a request acts as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("missing X-Caller header".to_string()))?
            .to_str()
            .map_err(|_| ApiError::BadRequest("X-Caller header is not valid text".to_string()))?;

        raw.parse::<Principal>()
            .map(Caller)
            .map_err(|e| ApiError::BadRequest(format!("invalid X-Caller: {}", e)))
    }
}
