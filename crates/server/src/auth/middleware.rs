use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::{Pool, Postgres};

use super::cookies;
use super::extractors::SessionToken;
use super::jwt::{hash_token, validate_access_token, Claims};
use crate::repo;

/// Permissive auth middleware.
///
/// Reads the session token from the cookie or Bearer header, validates it
/// and checks it against the revocation list. On success the `Claims` and
/// the raw `SessionToken` are inserted into request extensions. Requests
/// without a usable token pass through anonymously; route policies decide
/// what an anonymous caller may reach.
pub async fn auth_middleware(
    State(pool): State<Pool<Postgres>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = cookies::extract_token(req.headers()) {
        if let Some(claims) = authenticate(&pool, &token).await {
            req.extensions_mut().insert(claims);
            req.extensions_mut().insert(SessionToken(token));
        }
    }

    next.run(req).await
}

async fn authenticate(pool: &Pool<Postgres>, token: &str) -> Option<Claims> {
    let claims = match validate_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "rejected session token");
            return None;
        }
    };

    match repo::user::is_token_revoked(pool, &hash_token(token)).await {
        Ok(false) => Some(claims),
        Ok(true) => {
            tracing::debug!(user_id = claims.sub, "session token was revoked");
            None
        }
        // Without the revocation list the token cannot be trusted.
        Err(e) => {
            tracing::warn!(user_id = claims.sub, error = %e, "revocation lookup failed");
            None
        }
    }
}
