use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{get, offline_app, test_app};

#[tokio::test]
async fn health_reports_ok_with_database() {
    let (app, _pool, _guard) = test_app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "connected");
    assert!(body["version"].as_str().is_some());
    assert!(body["uptime_seconds"].as_u64().is_some());
}

#[tokio::test]
async fn health_degrades_without_database() {
    let app = offline_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}
