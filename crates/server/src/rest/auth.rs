use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use shared_types::{
    AppError, Case, MessageResponse, SigninRequest, SigninResponse, SignupRequest, User,
    UserCasesResponse, UserEnvelope, UserRole, UserTypeResponse,
};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::{AuthRequired, CurrentSession};
use crate::auth::{cookies, jwt, maybe_promote_admin, password};
use crate::error_convert::ValidateRequest;
use crate::repo::{case as case_repo, user as user_repo};

/// Role requested at signup. Admins are only ever created through
/// `ADMIN_EMAIL` promotion or by another admin.
fn signup_role(requested: Option<&str>) -> Result<UserRole, AppError> {
    let Some(raw) = requested else {
        return Ok(UserRole::default());
    };
    match UserRole::parse(raw) {
        Some(UserRole::Admin) => Err(AppError::invalid_field(
            "role",
            "Admin accounts cannot be self-registered",
        )),
        Some(role) => Ok(role),
        None => Err(AppError::invalid_field("role", "Role must be lawyer or judge")),
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation error", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, payload))]
pub async fn signup(
    State(pool): State<Pool<Postgres>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserEnvelope>), AppError> {
    let Json(mut payload) = payload?;
    payload.name = payload.name.trim().to_string();
    payload.validate_request()?;
    let role = signup_role(payload.role.as_deref())?;
    let email = normalize_email(&payload.email);
    let password_hash = password::hash_password(&payload.password)?;

    let mut user = user_repo::create(
        &pool,
        &payload.name,
        &email,
        &password_hash,
        role,
        payload.court_id.as_deref(),
    )
    .await?;

    let role = maybe_promote_admin(&pool, user.id, &user.email, role).await;
    user.role = role.as_str().to_string();
    tracing::info!(user_id = user.id, role = %role, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = SigninResponse),
        (status = 401, description = "Invalid email or password", body = AppError),
        (status = 422, description = "Validation error", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, payload))]
pub async fn signin(
    State(pool): State<Pool<Postgres>>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate_request()?;

    let credentials = user_repo::find_credentials(&pool, &normalize_email(&payload.email))
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !password::verify_password(&payload.password, &credentials.password_hash)? {
        tracing::info!(user_id = credentials.id, "signin rejected");
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let mut user = credentials.into_user();
    let role = maybe_promote_admin(&pool, user.id, &user.email, user.user_role()).await;
    user.role = role.as_str().to_string();

    let token = jwt::create_access_token(user.id, &user.email, role)
        .map_err(|e| AppError::internal(e.to_string()))?;
    tracing::info!(user_id = user.id, "user signed in");

    Ok((
        [(header::SET_COOKIE, cookies::build_session_cookie(&token))],
        Json(SigninResponse {
            message: "Signed in successfully".to_string(),
            token,
            user,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Token revoked; cookie cleared", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, session), fields(user_id = session.claims.sub))]
pub async fn logout(
    State(pool): State<Pool<Postgres>>,
    session: CurrentSession,
) -> Result<impl IntoResponse, AppError> {
    user_repo::revoke_token(
        &pool,
        &jwt::hash_token(&session.token.0),
        session.claims.sub,
        session.claims.expires_at(),
    )
    .await?;
    tracing::info!("session revoked");

    Ok((
        [(header::SET_COOKIE, cookies::build_clear_cookie())],
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 404, description = "User no longer exists", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, auth), fields(user_id = auth.0.sub))]
pub async fn me(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<User>, AppError> {
    let user = user_repo::find_by_id(&pool, auth.0.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/usertype",
    responses(
        (status = 200, description = "Role of the current session", body = UserTypeResponse),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth"
)]
pub async fn user_type(AuthRequired(claims): AuthRequired) -> Json<UserTypeResponse> {
    Json(UserTypeResponse { role: claims.role })
}

#[utoipa::path(
    get,
    path = "/getUserCases",
    responses(
        (status = 200, description = "Caller and the cases they filed", body = UserCasesResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 404, description = "User no longer exists", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, auth), fields(user_id = auth.0.sub))]
pub async fn user_cases(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<UserCasesResponse>, AppError> {
    let user = user_repo::find_by_id(&pool, auth.0.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let cases = case_repo::list_by_user(&pool, user.id)
        .await?
        .into_iter()
        .map(Case::from)
        .collect();
    Ok(Json(UserCasesResponse { user, cases }))
}

/// Same payload as `/getUserCases`; both route names are served.
#[utoipa::path(
    get,
    path = "/getUserCasesDetails",
    responses(
        (status = 200, description = "Caller and the cases they filed", body = UserCasesResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 404, description = "User no longer exists", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth"
)]
pub async fn user_cases_details(
    state: State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<UserCasesResponse>, AppError> {
    user_cases(state, auth).await
}
