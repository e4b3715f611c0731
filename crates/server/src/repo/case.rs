use serde_json::Value;
use shared_types::{
    severity_column, strip_reserved_keys, title_column, AppError, CaseRow, CreateCaseRequest,
    UpdateCaseRequest,
};
use sqlx::{Pool, Postgres};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// JSONB object to persist: the free-form keys minus reserved ones, with
/// `title` and `severity` kept as submitted.
fn stored_fields(
    mut fields: BTreeMap<String, Value>,
    title: Option<&Value>,
    severity: Option<&Value>,
) -> Value {
    strip_reserved_keys(&mut fields);
    if let Some(title) = title {
        fields.insert("title".to_string(), title.clone());
    }
    if let Some(severity) = severity {
        fields.insert("severity".to_string(), severity.clone());
    }
    Value::Object(fields.into_iter().collect())
}

/// Insert a new case owned by `user_id`. The caller has already checked
/// that `court_id` is present.
pub async fn create(
    pool: &Pool<Postgres>,
    user_id: i64,
    req: CreateCaseRequest,
) -> Result<CaseRow, AppError> {
    let title = title_column(req.title.as_ref());
    let severity = severity_column(req.severity.as_ref());
    let fields = stored_fields(req.fields, req.title.as_ref(), req.severity.as_ref());

    sqlx::query_as::<_, CaseRow>(
        r#"
        INSERT INTO cases (court_id, user_id, court_type, title, severity, fields)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, court_id, user_id, court_type, title, severity, fields,
                  created_at, updated_at
        "#,
    )
    .bind(req.court_id.trim())
    .bind(user_id)
    .bind(req.court_type)
    .bind(title)
    .bind(severity)
    .bind(fields)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Every case across every court, newest first.
pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<CaseRow>, AppError> {
    sqlx::query_as::<_, CaseRow>(
        r#"
        SELECT id, court_id, user_id, court_type, title, severity, fields,
               created_at, updated_at
        FROM cases
        ORDER BY created_at DESC, id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_by_court_id(
    pool: &Pool<Postgres>,
    court_id: &str,
) -> Result<Vec<CaseRow>, AppError> {
    sqlx::query_as::<_, CaseRow>(
        r#"
        SELECT id, court_id, user_id, court_type, title, severity, fields,
               created_at, updated_at
        FROM cases
        WHERE court_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(court_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_by_court_type(
    pool: &Pool<Postgres>,
    court_type: &str,
) -> Result<Vec<CaseRow>, AppError> {
    sqlx::query_as::<_, CaseRow>(
        r#"
        SELECT id, court_id, user_id, court_type, title, severity, fields,
               created_at, updated_at
        FROM cases
        WHERE court_type = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(court_type)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Cases created by one user, newest first.
pub async fn list_by_user(pool: &Pool<Postgres>, user_id: i64) -> Result<Vec<CaseRow>, AppError> {
    sqlx::query_as::<_, CaseRow>(
        r#"
        SELECT id, court_id, user_id, court_type, title, severity, fields,
               created_at, updated_at
        FROM cases
        WHERE user_id = $1
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Apply a partial update. Typed columns are replaced only when present;
/// extra keys are merged into `fields` (JSONB `||`, top level). A present
/// `title` or `severity` always resets its column, to NULL when the new
/// value does not project. Returns `None` when no case has this id.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: UpdateCaseRequest,
) -> Result<Option<CaseRow>, AppError> {
    let patch = stored_fields(req.fields, req.title.as_ref(), req.severity.as_ref());

    sqlx::query_as::<_, CaseRow>(
        r#"
        UPDATE cases SET
            court_id   = COALESCE($2, court_id),
            court_type = COALESCE($3, court_type),
            title      = CASE WHEN $7 THEN $4::text ELSE title END,
            severity   = CASE WHEN $8 THEN $5::integer ELSE severity END,
            fields     = fields || $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, court_id, user_id, court_type, title, severity, fields,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(req.court_id.as_deref().map(str::trim))
    .bind(req.court_type)
    .bind(title_column(req.title.as_ref()))
    .bind(severity_column(req.severity.as_ref()))
    .bind(patch)
    .bind(req.title.is_some())
    .bind(req.severity.is_some())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Delete a case, returning the removed row (`None` when absent).
pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<CaseRow>, AppError> {
    sqlx::query_as::<_, CaseRow>(
        r#"
        DELETE FROM cases
        WHERE id = $1
        RETURNING id, court_id, user_id, court_type, title, severity, fields,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
