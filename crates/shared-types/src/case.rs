use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::User;

/// Keys the server owns. They are dropped from submitted extra fields so a
/// client echoing a case back cannot shadow the real columns.
pub const RESERVED_CASE_KEYS: &[&str] = &[
    "_id", "id", "userID", "createdAt", "updatedAt", "courtID", "courtType", "title", "severity",
];

/// Remove server-owned keys from a free-form field map.
pub fn strip_reserved_keys(fields: &mut BTreeMap<String, Value>) {
    for key in RESERVED_CASE_KEYS {
        fields.remove(*key);
    }
}

/// Value for the indexed `title` column. Only JSON strings project.
pub fn title_column(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

/// Value for the indexed `severity` column. Only integers that fit an
/// `INTEGER` project; `"high"`, `2.5` or `"2"` stay JSON-only.
pub fn severity_column(value: Option<&Value>) -> Option<i32> {
    value
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
}

// ── DB row struct ───────────────────────────────────────────────────

/// A case as stored in the single `cases` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct CaseRow {
    pub id: Uuid,
    pub court_id: String,
    pub user_id: i64,
    pub court_type: Option<String>,
    pub title: Option<String>,
    pub severity: Option<i32>,
    /// Free-form JSONB object holding every submitted key without a column,
    /// plus `title` and `severity` exactly as submitted.
    pub fields: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── API types ───────────────────────────────────────────────────────

/// API shape of a case: the typed columns plus the extra fields flattened
/// into the same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Case {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "courtID")]
    pub court_id: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
    #[serde(rename = "courtType", default, skip_serializing_if = "Option::is_none")]
    pub court_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Value>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl From<CaseRow> for Case {
    fn from(row: CaseRow) -> Self {
        let mut fields: BTreeMap<String, Value> = match row.fields {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        };
        let title = fields.remove("title").or(row.title.map(Value::from));
        let severity = fields.remove("severity").or(row.severity.map(Value::from));
        Case {
            id: row.id,
            court_id: row.court_id,
            user_id: row.user_id,
            court_type: row.court_type,
            title,
            severity,
            created_at: row.created_at,
            updated_at: row.updated_at,
            fields,
        }
    }
}

/// Body of `POST /addCase`. Unknown keys are kept as extra case fields.
/// `title` and `severity` accept any JSON value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCaseRequest {
    #[serde(rename = "courtID", default)]
    pub court_id: String,
    #[serde(rename = "courtType", default)]
    pub court_type: Option<String>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub severity: Option<Value>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

/// Body of `PUT /updateCase/{id}`. Present typed keys replace their column,
/// every other key is merged into the extra fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCaseRequest {
    #[serde(rename = "courtID", default)]
    pub court_id: Option<String>,
    #[serde(rename = "courtType", default)]
    pub court_type: Option<String>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub severity: Option<Value>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

/// `{"message": ..., "case": ...}` body for case mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseEnvelope {
    pub message: String,
    pub case: Case,
}

impl CaseEnvelope {
    pub fn new(message: impl Into<String>, case: Case) -> Self {
        Self {
            message: message.into(),
            case,
        }
    }
}

/// Cases owned by the current user, alongside the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserCasesResponse {
    pub user: User,
    pub cases: Vec<Case>,
}
