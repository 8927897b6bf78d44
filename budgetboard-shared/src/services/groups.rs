/// Group service
///
/// Groups are shared across boards, so any authenticated user may manage
/// them. Names are unique within a subject.

use std::sync::Arc;
use tracing::{debug, info};

use crate::db::store::Store;
use crate::error::{FieldErrors, ServiceError, ServiceResult, StoreError, INVALID_VALUE};
use crate::models::group::{CreateGroup, Group, GroupFilter, GroupWrite, UpdateGroup};
use crate::validation::{entity_name, required, typed, SHOULD_BE_TEXT};

#[derive(Clone)]
pub struct GroupService {
    store: Arc<dyn Store>,
}

fn duplicate(name: &str) -> ServiceError {
    ServiceError::field("name", format!("\"{}\" group already exists in this subject.", name))
}

impl GroupService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn search(&self, filter: GroupFilter) -> ServiceResult<Vec<Group>> {
        debug!("Searching groups");
        Ok(self.store.search_groups(&filter).await?)
    }

    pub async fn find(&self, id: i64) -> ServiceResult<Group> {
        self.store
            .find_group(id)
            .await?
            .ok_or_else(ServiceError::not_found)
    }

    pub async fn create(&self, dto: CreateGroup) -> ServiceResult<Group> {
        let write = self
            .validate(
                typed(dto.name, SHOULD_BE_TEXT),
                typed(dto.subject_id, INVALID_VALUE),
            )
            .await?;
        self.ensure_unique(&write, None).await?;

        let id = self
            .store
            .insert_group(&write)
            .await
            .map_err(|e| conflict_or(e, &write))?;

        info!(group_id = id, subject_id = write.subject_id, "Group created");
        self.find(id).await
    }

    pub async fn update(&self, id: i64, dto: UpdateGroup) -> ServiceResult<Group> {
        let group = self.find(id).await?;
        if dto.is_empty() {
            return Ok(group);
        }

        let current = GroupWrite::from(&group);
        let write = self
            .validate(
                typed(dto.name, SHOULD_BE_TEXT).map(|name| name.or(Some(current.name))),
                typed(dto.subject_id, INVALID_VALUE).map(|id| id.or(Some(current.subject_id))),
            )
            .await?;
        self.ensure_unique(&write, Some(id)).await?;

        self.store
            .update_group(id, &write)
            .await
            .map_err(|e| conflict_or(e, &write))?;

        info!(group_id = id, "Group updated");
        self.find(id).await
    }

    /// Deletes the group; its categories stay, ungrouped
    pub async fn delete(&self, id: i64) -> ServiceResult<Group> {
        let group = self.find(id).await?;
        self.store.delete_group(id).await?;

        info!(group_id = id, "Group deleted");
        Ok(group)
    }

    /// Each argument is a field after its JSON type check
    async fn validate(
        &self,
        name: Result<Option<String>, &'static str>,
        subject_id: Result<Option<i64>, &'static str>,
    ) -> ServiceResult<GroupWrite> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", name.and_then(|name| entity_name(name.as_deref())));
        let subject_id = errors.check("subjectId", subject_id.and_then(required));

        let (name, subject_id) = match (name, subject_id) {
            (Some(name), Some(subject_id)) => (name, subject_id),
            _ => return Err(ServiceError::BadRequest(errors)),
        };

        if self.store.find_group_subject(subject_id).await?.is_none() {
            return Err(ServiceError::field("subjectId", INVALID_VALUE));
        }

        Ok(GroupWrite { name, subject_id })
    }

    async fn ensure_unique(&self, write: &GroupWrite, exclude_id: Option<i64>) -> ServiceResult<()> {
        match self.store.find_group_duplicate(write, exclude_id).await? {
            Some(_) => Err(duplicate(&write.name)),
            None => Ok(()),
        }
    }
}

fn conflict_or(e: StoreError, write: &GroupWrite) -> ServiceError {
    match e {
        StoreError::UniqueViolation(_) => duplicate(&write.name),
        other => other.into(),
    }
}
