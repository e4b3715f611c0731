use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Court user role controlling which routes a user may invoke.
///
/// - `Lawyer`: files, edits and deletes cases.
/// - `Judge`: reads the per-court dashboards.
/// - `Admin`: full access (satisfies every role requirement).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Lawyer,
    Judge,
    Admin,
}

impl UserRole {
    /// Strict parse, used for request bodies and stored rows.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lawyer" => Some(UserRole::Lawyer),
            "judge" => Some(UserRole::Judge),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Lowercase string for database / JWT storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Lawyer => "lawyer",
            UserRole::Judge => "judge",
            UserRole::Admin => "admin",
        }
    }

    /// Returns true if this role satisfies the `required` role.
    /// Admin satisfies all roles; lawyer and judge only satisfy themselves.
    pub fn satisfies(&self, required: UserRole) -> bool {
        match self {
            UserRole::Admin => true,
            other => *other == required,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user in the system. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct User {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(rename = "courtID", default, skip_serializing_if = "Option::is_none")]
    pub court_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Parsed role; rows are constrained by a CHECK so this only falls back
    /// to the least-privileged role for hand-edited data.
    pub fn user_role(&self) -> UserRole {
        UserRole::parse(&self.role).unwrap_or_default()
    }
}
