/// Categories
///
/// A category belongs to exactly one board and one [`Family`]. Finance and
/// budget categories are classified by a [`CategoryType`]; activity
/// categories carry a free-text `unit` instead ("km", "pages", ...). A
/// category may optionally sit in a [`GroupRef`].
///
/// Within one (family, board) no two categories share the same name and
/// type/unit.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE record_family AS ENUM ('finance', 'budget', 'activity');
///
/// CREATE TABLE categories (
///     id BIGSERIAL PRIMARY KEY,
///     family record_family NOT NULL,
///     name VARCHAR(100) NOT NULL,
///     board_id BIGINT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     type_id BIGINT REFERENCES category_types(id),
///     unit VARCHAR(50),
///     group_id BIGINT REFERENCES groups(id) ON DELETE SET NULL
/// );
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::board::BoardRef;
use super::double_option;
use super::group::GroupRef;
use super::reference::CategoryType;
use crate::validation::Lenient;

/// Record family shared by categories and their records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "record_family", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Income and expense transactions
    Finance,

    /// Planned amounts in a currency
    Budget,

    /// Measured activities with a unit
    Activity,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Finance, Family::Budget, Family::Activity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Finance => "finance",
            Family::Budget => "budget",
            Family::Activity => "activity",
        }
    }

    /// Categories of this family require a `typeId`
    pub fn uses_type(&self) -> bool {
        !self.uses_unit()
    }

    /// Categories of this family require a `unit`
    pub fn uses_unit(&self) -> bool {
        matches!(self, Family::Activity)
    }

    /// Records of this family require a `currencySlug`
    pub fn uses_currency(&self) -> bool {
        matches!(self, Family::Budget)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown family name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown family: {0}")]
pub struct UnknownFamily(pub String);

impl FromStr for Family {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finance" => Ok(Family::Finance),
            "budget" => Ok(Family::Budget),
            "activity" => Ok(Family::Activity),
            other => Err(UnknownFamily(other.to_string())),
        }
    }
}

/// Category with board, type and group joined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub family: Family,
    pub name: String,
    pub board: BoardRef,

    /// Finance and budget only
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category_type: Option<CategoryType>,

    /// Activity only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    pub group: Option<GroupRef>,
}

/// Category creation input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub name: Option<Lenient<String>>,
    pub board_id: Option<Lenient<i64>>,
    pub type_id: Option<Lenient<i64>>,
    pub unit: Option<Lenient<String>>,
    pub group_id: Option<Lenient<i64>>,
}

/// Partial category update; absent fields keep their value
///
/// `groupId: null` detaches the category from its group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<Lenient<String>>,
    pub board_id: Option<Lenient<i64>>,
    pub type_id: Option<Lenient<i64>>,
    pub unit: Option<Lenient<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub group_id: Option<Option<Lenient<i64>>>,
}

impl UpdateCategory {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.board_id.is_none()
            && self.type_id.is_none()
            && self.unit.is_none()
            && self.group_id.is_none()
    }
}

/// Complete, validated category row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWrite {
    pub name: String,
    pub board_id: i64,
    pub type_id: Option<i64>,
    pub unit: Option<String>,
    pub group_id: Option<i64>,
}

impl From<&Category> for CategoryWrite {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            board_id: category.board.id,
            type_id: category.category_type.as_ref().map(|t| t.id),
            unit: category.unit.clone(),
            group_id: category.group.as_ref().map(|g| g.id),
        }
    }
}

/// Category search filter; `None` fields do not constrain
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub ids: Option<Vec<i64>>,
    pub board_ids: Option<Vec<i64>>,
    pub group_ids: Option<Vec<i64>>,
    pub type_ids: Option<Vec<i64>>,
}
