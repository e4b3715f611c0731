use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use shared_types::{AppError, UpdateUserRequest, User, UserEnvelope, UserRole};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::AuthRequired;
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo::user as user_repo;

use super::auth::normalize_email;

/// Who may apply which edit. Returns the role change to persist, if any.
fn authorize_edit(
    claims: &Claims,
    target_id: i64,
    req: &UpdateUserRequest,
) -> Result<Option<UserRole>, AppError> {
    let is_admin = claims.user_role() == Some(UserRole::Admin);

    if claims.sub != target_id && !is_admin {
        return Err(AppError::forbidden("You may only edit your own profile"));
    }

    let Some(raw) = req.role.as_deref() else {
        return Ok(None);
    };
    let role = UserRole::parse(raw)
        .ok_or_else(|| AppError::invalid_field("role", "Role must be lawyer, judge or admin"))?;
    if !is_admin {
        return Err(AppError::forbidden("Only an admin may change roles"));
    }
    Ok(Some(role))
}

#[utoipa::path(
    get,
    path = "/allusers",
    responses(
        (status = 200, description = "Every user", body = Vec<User>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Admin role required", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(pool))]
pub async fn list_users(State(pool): State<Pool<Postgres>>) -> Result<Json<Vec<User>>, AppError> {
    let users = user_repo::list(&pool).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 404, description = "User not found", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(pool))]
pub async fn get_user(
    State(pool): State<Pool<Postgres>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let Path(id) = id?;
    user_repo::find_by_id(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User not found"))
}

#[utoipa::path(
    put,
    path = "/user/edit/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Not allowed to edit this user", body = AppError),
        (status = 404, description = "User not found", body = AppError),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "users"
)]
#[tracing::instrument(skip(pool, claims, payload), fields(actor = claims.sub))]
pub async fn edit_user(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, AppError> {
    let Path(id) = id?;
    let Json(mut payload) = payload?;
    let role = authorize_edit(&claims, id, &payload)?;
    payload.name = payload.name.as_deref().map(|n| n.trim().to_string());
    payload.validate_request()?;
    payload.email = payload.email.as_deref().map(normalize_email);

    let user = user_repo::update(&pool, id, &payload, role)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if let Some(role) = role {
        tracing::info!(user_id = id, role = %role, "user role changed");
    }

    Ok(Json(UserEnvelope {
        message: "User updated successfully".to_string(),
        user,
    }))
}
