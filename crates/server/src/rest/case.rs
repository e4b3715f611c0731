use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use shared_types::{AppError, Case, CaseEnvelope, CreateCaseRequest, UpdateCaseRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::extractors::AuthRequired;
use crate::repo::case as case_repo;

/// A malformed id cannot name a case, so it is reported like a missing one.
fn parse_case_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Case not found"))
}

fn into_cases(rows: Vec<shared_types::CaseRow>) -> Vec<Case> {
    rows.into_iter().map(Case::from).collect()
}

#[utoipa::path(
    post,
    path = "/addCase",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = CaseEnvelope),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Lawyer role required", body = AppError),
        (status = 400, description = "Malformed JSON body", body = AppError),
        (status = 422, description = "courtID missing", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, auth, body), fields(user_id = auth.0.sub))]
pub async fn add_case(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    body: Result<Json<CreateCaseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CaseEnvelope>), AppError> {
    let Json(body) = body?;
    if body.court_id.trim().is_empty() {
        return Err(AppError::invalid_field("courtID", "courtID is required"));
    }

    let row = case_repo::create(&pool, auth.0.sub, body).await?;
    tracing::info!(case_id = %row.id, court_id = %row.court_id, "case added");

    Ok((
        StatusCode::CREATED,
        Json(CaseEnvelope::new("Case added successfully", row.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/allCases",
    responses(
        (status = 200, description = "Every case, newest first", body = Vec<Case>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool))]
pub async fn all_cases(State(pool): State<Pool<Postgres>>) -> Result<Json<Vec<Case>>, AppError> {
    let rows = case_repo::list_all(&pool).await?;
    Ok(Json(into_cases(rows)))
}

#[utoipa::path(
    put,
    path = "/updateCase/{id}",
    params(("id" = String, Path, description = "Case UUID")),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Case updated", body = CaseEnvelope),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Lawyer role required", body = AppError),
        (status = 404, description = "Case not found", body = AppError),
        (status = 422, description = "Invalid field", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool, body))]
pub async fn update_case(
    State(pool): State<Pool<Postgres>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateCaseRequest>, JsonRejection>,
) -> Result<Json<CaseEnvelope>, AppError> {
    let uuid = parse_case_id(&id)?;
    let Json(body) = body?;

    if matches!(body.court_id.as_deref(), Some(c) if c.trim().is_empty()) {
        return Err(AppError::invalid_field("courtID", "courtID must not be empty"));
    }

    let row = case_repo::update(&pool, uuid, body)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;

    Ok(Json(CaseEnvelope::new("Case updated successfully", row.into())))
}

#[utoipa::path(
    delete,
    path = "/deleteCase/{caseId}",
    params(("caseId" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Case deleted", body = CaseEnvelope),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Lawyer role required", body = AppError),
        (status = 404, description = "Case not found", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool))]
pub async fn delete_case(
    State(pool): State<Pool<Postgres>>,
    Path(case_id): Path<String>,
) -> Result<Json<CaseEnvelope>, AppError> {
    let uuid = parse_case_id(&case_id)?;

    let row = case_repo::delete(&pool, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Case not found"))?;
    tracing::info!(case_id = %row.id, "case deleted");

    Ok(Json(CaseEnvelope::new("Case deleted successfully", row.into())))
}

#[utoipa::path(
    get,
    path = "/getCasesByCourtType/{courtType}",
    params(("courtType" = String, Path, description = "Court type, e.g. district")),
    responses(
        (status = 200, description = "Cases of this court type", body = Vec<Case>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Judge role required", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool))]
pub async fn cases_by_court_type(
    State(pool): State<Pool<Postgres>>,
    Path(court_type): Path<String>,
) -> Result<Json<Vec<Case>>, AppError> {
    let rows = case_repo::list_by_court_type(&pool, &court_type).await?;
    Ok(Json(into_cases(rows)))
}

#[utoipa::path(
    get,
    path = "/getCasesByCourtID/{courtID}",
    params(("courtID" = String, Path, description = "Court identifier")),
    responses(
        (status = 200, description = "Cases filed in this court", body = Vec<Case>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Judge role required", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "cases"
)]
#[tracing::instrument(skip(pool))]
pub async fn cases_by_court_id(
    State(pool): State<Pool<Postgres>>,
    Path(court_id): Path<String>,
) -> Result<Json<Vec<Case>>, AppError> {
    let rows = case_repo::list_by_court_id(&pool, &court_id).await?;
    Ok(Json(into_cases(rows)))
}
