/// Boards
///
/// A board owns categories (and through them records). Its name is globally
/// unique. Administrators manage the board; administrators and members both
/// read and write its categories and records.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE TABLE board_administrators (board_id, user_id);
/// CREATE TABLE board_members (board_id, user_id);
/// ```

use serde::{Deserialize, Serialize};

use super::user::UserRef;
use crate::validation::Lenient;

/// Board with its roles resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub name: String,
    pub administrators: Vec<UserRef>,
    pub members: Vec<UserRef>,
}

impl Board {
    pub fn is_administrator(&self, user_id: i64) -> bool {
        self.administrators.iter().any(|u| u.id == user_id)
    }

    pub fn is_member(&self, user_id: i64) -> bool {
        self.members.iter().any(|u| u.id == user_id)
    }
}

/// Compact board reference embedded in categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBoard {
    pub name: Option<Lenient<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBoard {
    pub name: Option<Lenient<String>>,
}

impl UpdateBoard {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

/// Membership change input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMember {
    pub user_id: Option<Lenient<i64>>,
}

/// Board search filter
///
/// `is_admin` / `is_member` are relative to the caller: `Some(true)` keeps
/// only boards where the caller holds the role, `Some(false)` only boards
/// where they do not.
#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    pub ids: Option<Vec<i64>>,
    /// Case-insensitive substring
    pub name: Option<String>,
    pub is_admin: Option<bool>,
    pub is_member: Option<bool>,
}
