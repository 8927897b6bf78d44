/// Category groups
///
/// Groups bundle categories for reporting. Every group belongs to a subject
/// (`finance`, `budget`, `activity`) and its name is unique within that
/// subject. Groups are shared across boards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE groups (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     subject_id BIGINT NOT NULL REFERENCES group_subjects(id),
///     CONSTRAINT groups_unique_in_subject UNIQUE (subject_id, name)
/// );
/// ```

use serde::{Deserialize, Serialize};

use crate::validation::Lenient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupSubject {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub subject: GroupSubject,
}

/// Compact group reference embedded in categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    pub name: Option<Lenient<String>>,
    pub subject_id: Option<Lenient<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroup {
    pub name: Option<Lenient<String>>,
    pub subject_id: Option<Lenient<i64>>,
}

impl UpdateGroup {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.subject_id.is_none()
    }
}

/// Complete, validated group row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupWrite {
    pub name: String,
    pub subject_id: i64,
}

impl From<&Group> for GroupWrite {
    fn from(group: &Group) -> Self {
        Self {
            name: group.name.clone(),
            subject_id: group.subject.id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub ids: Option<Vec<i64>>,
    pub subject_ids: Option<Vec<i64>>,
}
