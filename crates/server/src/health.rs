use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the process start time. Only the first call has effect.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

pub fn uptime_seconds() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: String,
    pub db: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(pool): State<Pool<Postgres>>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, db) = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&pool)
        .await
    {
        Ok(_) => ("ok", StatusCode::OK, "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach the database");
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, format!("error: {e}"))
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            db,
            uptime_seconds: uptime_seconds(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
