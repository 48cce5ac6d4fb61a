//! Caller extraction
//!
//! Provides the `Caller` extractor: bearer token to identity, then identity
//! to a fully resolved [`CallerContext`]. Handlers receive the context and
//! pass it down explicitly.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::domain::StringUuid;
use crate::error::AppError;
use crate::policy::CallerContext;
use crate::state::HasServices;

/// Resolved caller for the current request
#[derive(Debug, Clone)]
pub struct Caller(pub CallerContext);

impl std::ops::Deref for Caller {
    type Target = CallerContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extract the Bearer token from the Authorization header.
///
/// `Ok(None)` when the header is absent.
fn extract_bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header must use Bearer scheme".to_string())
        })
}

fn authenticate<S: HasServices>(parts: &Parts, state: &S) -> Result<Option<StringUuid>, AppError> {
    match extract_bearer_token(&parts.headers)? {
        None => Ok(None),
        Some(token) => state
            .jwt_verifier()
            .identity(token)
            .map(Some)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            }),
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: HasServices + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)?;
        let ctx = state.identity_resolver().resolve(identity).await?;
        Ok(Caller(ctx))
    }
}
