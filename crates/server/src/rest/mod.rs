pub mod auth;
pub mod case;
pub mod home;
pub mod user;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use shared_types::UserRole;

use crate::auth::policy::Policy;
use crate::db::AppState;
use crate::health;

const JUDGE: Policy = Policy::Role(UserRole::Judge);
const LAWYER: Policy = Policy::Role(UserRole::Lawyer);
const ADMIN: Policy = Policy::Role(UserRole::Admin);

/// The API route table. Every route carries exactly one access policy,
/// checked before its handler runs.
pub fn api_router() -> Router<AppState> {
    use Policy::{Authenticated, Open};

    Router::new()
        // Operational
        .route("/", Open.guard(get(home::home)))
        .route("/health", Open.guard(get(health::health_check)))
        // Cases
        .route(
            "/getCasesByCourtType/{courtType}",
            JUDGE.guard(get(case::cases_by_court_type)),
        )
        .route(
            "/getCasesByCourtID/{courtID}",
            JUDGE.guard(get(case::cases_by_court_id)),
        )
        .route("/updateCase/{id}", LAWYER.guard(put(case::update_case)))
        .route("/allCases", Authenticated.guard(get(case::all_cases)))
        .route("/addCase", LAWYER.guard(post(case::add_case)))
        .route("/deleteCase/{caseId}", LAWYER.guard(delete(case::delete_case)))
        // Auth
        .route("/signup", Open.guard(post(auth::signup)))
        .route("/signin", Open.guard(post(auth::signin)))
        .route("/logout", Authenticated.guard(get(auth::logout)))
        .route("/me", Authenticated.guard(get(auth::me)))
        .route("/usertype", Authenticated.guard(get(auth::user_type)))
        .route("/getUserCases", Authenticated.guard(get(auth::user_cases)))
        .route(
            "/getUserCasesDetails",
            Authenticated.guard(get(auth::user_cases_details)),
        )
        // Users
        .route("/allusers", ADMIN.guard(get(user::list_users)))
        .route("/user/{id}", Authenticated.guard(get(user::get_user)))
        .route("/user/edit/{id}", Authenticated.guard(put(user::edit_user)))
}
