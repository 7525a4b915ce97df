//! Request extractors.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::domain::{AuthError, Identity};

use super::{error::ApiError, state::AppState};

/// Caller identity verified from the `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when the header is absent or the gate refuses the token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let credential = bearer_token(parts).ok_or(ApiError::Unauthorized)?;

        state
            .identity_gate
            .verify(credential)
            .map(AuthenticatedUser)
            .map_err(|e: AuthError| {
                tracing::debug!("Rejected credential: {}", e);
                ApiError::Unauthorized
            })
    }
}

/// Credential of an `Authorization: Bearer <token>` header. The scheme
/// name is case-insensitive.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.trim_start().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| credential.trim())
}
