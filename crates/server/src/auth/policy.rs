//! Per-route access policies.
//!
//! Every route in the API table is wrapped with exactly one [`Policy`]. The
//! policy runs as a route layer after the auth middleware has attached (or
//! not attached) `Claims`, and before any handler or database work.

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use shared_types::{AppError, UserRole};

use super::jwt::Claims;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Anyone, authenticated or not.
    Open,
    /// Any valid, unrevoked session.
    Authenticated,
    /// A session whose role satisfies the given role (admin satisfies all).
    Role(UserRole),
}

impl Policy {
    /// 401 when a session is required but missing, 403 when the session's
    /// role is insufficient or unrecognized.
    pub fn evaluate(&self, claims: Option<&Claims>) -> Result<(), AppError> {
        let required = match self {
            Policy::Open => return Ok(()),
            Policy::Authenticated => None,
            Policy::Role(role) => Some(*role),
        };

        let claims = claims.ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let Some(required) = required else {
            return Ok(());
        };

        match claims.user_role() {
            Some(role) if role.satisfies(required) => Ok(()),
            _ => Err(AppError::forbidden(format!("{required} role required"))),
        }
    }

    /// Wrap a method router so this policy is enforced before its handlers.
    pub fn guard<S>(self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        route.route_layer(middleware::from_fn_with_state(self, enforce))
    }
}

async fn enforce(
    State(policy): State<Policy>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(err) = policy.evaluate(req.extensions().get::<Claims>()) {
        tracing::debug!(?policy, path = %req.uri().path(), error = %err, "request denied by policy");
        return Err(err);
    }
    Ok(next.run(req).await)
}
