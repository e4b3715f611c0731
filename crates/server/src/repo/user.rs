use chrono::{DateTime, Utc};
use shared_types::{AppError, UpdateUserRequest, User, UserRole};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

/// User row including the password hash. Only used for signin; never
/// leaves this module as-is.
#[derive(sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub court_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub password_hash: String,
}

impl Credentials {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
            court_id: self.court_id,
            created_at: self.created_at,
        }
    }
}

pub async fn create(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    password_hash: &str,
    role: UserRole,
    court_id: Option<&str>,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, role, court_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, role, court_id, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(court_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Case-insensitive lookup by email, with the password hash.
pub async fn find_credentials(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<Credentials>, AppError> {
    sqlx::query_as::<_, Credentials>(
        r#"
        SELECT id, name, email, role, court_id, created_at, password_hash
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, role, court_id, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list(pool: &Pool<Postgres>) -> Result<Vec<User>, AppError> {
    sqlx::query_as::<_, User>(
        "SELECT id, name, email, role, court_id, created_at FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Partial profile update. `role` must already be authorized by the caller.
pub async fn update(
    pool: &Pool<Postgres>,
    id: i64,
    req: &UpdateUserRequest,
    role: Option<UserRole>,
) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            name     = COALESCE($2, name),
            email    = COALESCE($3, email),
            court_id = COALESCE($4, court_id),
            role     = COALESCE($5, role)
        WHERE id = $1
        RETURNING id, name, email, role, court_id, created_at
        "#,
    )
    .bind(id)
    .bind(req.name.as_deref().map(str::trim))
    .bind(req.email.as_deref().map(str::trim))
    .bind(req.court_id.as_deref())
    .bind(role.map(|r| r.as_str()))
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn set_role(pool: &Pool<Postgres>, id: i64, role: UserRole) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
        .bind(id)
        .bind(role.as_str())
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

/// Record a token hash as revoked. Revoking the same token twice is a no-op.
pub async fn revoke_token(
    pool: &Pool<Postgres>,
    token_hash: &str,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO revoked_tokens (token_hash, user_id, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (token_hash) DO NOTHING
        "#,
    )
    .bind(token_hash)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;
    Ok(())
}

pub async fn is_token_revoked(pool: &Pool<Postgres>, token_hash: &str) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE token_hash = $1)",
    )
    .bind(token_hash)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Drop revocation entries whose tokens have expired anyway.
pub async fn purge_expired_revocations(pool: &Pool<Postgres>) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;
    Ok(result.rows_affected())
}
