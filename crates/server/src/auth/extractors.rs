use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::AppError;

use super::jwt::Claims;

/// Raw token of the current session, inserted next to `Claims` by the auth
/// middleware so logout can revoke exactly this token.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Authenticated claims plus the raw token they were decoded from.
pub struct CurrentSession {
    pub claims: Claims,
    pub token: SessionToken,
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthRequired(claims) = AuthRequired::from_request_parts(parts, state).await?;
        let token = parts
            .extensions
            .get::<SessionToken>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;
        Ok(CurrentSession { claims, token })
    }
}
