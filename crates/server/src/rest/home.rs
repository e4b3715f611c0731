use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HomeResponse {
    pub message: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = HomeResponse)
    ),
    tag = "health"
)]
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "Courtdesk case management API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
