/// User accounts
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(50) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Board roles live in `board_administrators` and `board_members` and are
/// loaded separately as [`BoardRoles`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::Lenient;

/// User account
///
/// Serializes without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Compact user reference embedded in boards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRef {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Account registration input, validated by the user service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    pub username: Option<Lenient<String>>,
    pub password: Option<Lenient<String>>,
}

/// Validated row for insertion
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Boards a user administers and boards a user is a member of
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardRoles {
    pub administrated: Vec<i64>,
    pub member: Vec<i64>,
}

/// User search filter; `None` fields do not constrain
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub ids: Option<Vec<i64>>,
    pub usernames: Option<Vec<String>>,
}
