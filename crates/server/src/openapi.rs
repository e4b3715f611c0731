use axum::Router;
use shared_types::{
    AppError, AppErrorKind, Case, CaseEnvelope, CreateCaseRequest, MessageResponse,
    SigninRequest, SigninResponse, SignupRequest, UpdateCaseRequest, UpdateUserRequest, User,
    UserCasesResponse, UserEnvelope, UserRole, UserTypeResponse,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::middleware::auth_middleware;
use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::rest::{self, home::HomeResponse};
use crate::telemetry::OtelTraceLayer;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::home::home,
        health::health_check,
        rest::case::add_case,
        rest::case::all_cases,
        rest::case::update_case,
        rest::case::delete_case,
        rest::case::cases_by_court_type,
        rest::case::cases_by_court_id,
        rest::auth::signup,
        rest::auth::signin,
        rest::auth::logout,
        rest::auth::me,
        rest::auth::user_type,
        rest::auth::user_cases,
        rest::auth::user_cases_details,
        rest::user::list_users,
        rest::user::get_user,
        rest::user::edit_user,
    ),
    components(schemas(
        AppError, AppErrorKind, Case, CaseEnvelope, CreateCaseRequest, UpdateCaseRequest,
        User, UserRole, SignupRequest, SigninRequest, SigninResponse, UpdateUserRequest,
        UserEnvelope, UserTypeResponse, UserCasesResponse, MessageResponse,
        HealthResponse, HomeResponse,
    )),
    tags(
        (name = "cases", description = "Case filing, dashboards and the all-cases listing"),
        (name = "auth", description = "Signup, signin, logout and the current session"),
        (name = "users", description = "User directory and profile edits"),
        (name = "health", description = "Banner and health check")
    ),
    info(
        title = "Courtdesk API",
        description = "Court case management API",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

/// Build the complete application router: the route table with its
/// policies, the auth middleware in front of it, request spans when
/// telemetry is on, and `/docs` when enabled.
pub fn app_router(state: AppState) -> Router {
    let flags = crate::config::feature_flags();

    let mut router = rest::api_router();
    if flags.telemetry {
        router = router.layer(OtelTraceLayer);
    }

    let mut router = router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    if flags.docs {
        router = router.merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    router
}
