pub mod cookies;
pub mod extractors;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod policy;

use shared_types::UserRole;

use crate::repo;

/// Check if the given email matches the `ADMIN_EMAIL` env var (case-insensitive).
/// Returns `false` if the env var is empty or unset.
pub fn is_admin_email(email: &str) -> bool {
    match std::env::var("ADMIN_EMAIL") {
        Ok(admin) if !admin.trim().is_empty() => admin.trim().eq_ignore_ascii_case(email),
        _ => false,
    }
}

/// If the email matches `ADMIN_EMAIL`, promote the user to admin.
/// Returns the (possibly updated) role. A failed update is logged and the
/// current role is kept.
pub async fn maybe_promote_admin(
    pool: &sqlx::PgPool,
    user_id: i64,
    email: &str,
    current_role: UserRole,
) -> UserRole {
    if current_role == UserRole::Admin || !is_admin_email(email) {
        return current_role;
    }

    match repo::user::set_role(pool, user_id, UserRole::Admin).await {
        Ok(()) => {
            tracing::info!(user_id, email, "promoted user to admin via ADMIN_EMAIL");
            UserRole::Admin
        }
        Err(e) => {
            tracing::error!(user_id, email, error = %e, "failed to promote admin");
            current_role
        }
    }
}
