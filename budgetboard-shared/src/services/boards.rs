/// Board service
///
/// Boards are visible to every authenticated user so that people can find a
/// board to ask for membership. Renaming, deleting and adding members is
/// reserved to administrators; a member may remove themselves.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::authorization::{is_board_admin, require_board_admin};
use crate::auth::middleware::AuthorizedUser;
use crate::db::store::Store;
use crate::error::{ServiceError, ServiceResult, StoreError, INVALID_VALUE};
use crate::models::board::{AddMember, Board, BoardFilter, CreateBoard, UpdateBoard};
use crate::validation::{entity_name, required, typed, Lenient, SHOULD_BE_TEXT};

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn Store>,
}

fn duplicate(name: &str) -> ServiceError {
    ServiceError::field("name", format!("\"{}\" board already exists.", name))
}

fn board_name(value: Option<Lenient<String>>) -> ServiceResult<String> {
    typed(value, SHOULD_BE_TEXT)
        .and_then(|name| entity_name(name.as_deref()))
        .map_err(|m| ServiceError::field("name", m))
}

fn conflict_or(e: StoreError, name: &str) -> ServiceError {
    match e {
        StoreError::UniqueViolation(_) => duplicate(name),
        other => other.into(),
    }
}

impl BoardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn search(&self, user: &AuthorizedUser, filter: BoardFilter) -> ServiceResult<Vec<Board>> {
        debug!(user_id = user.id, "Searching boards");
        Ok(self.store.search_boards(&filter, user.id).await?)
    }

    pub async fn find(&self, id: i64) -> ServiceResult<Board> {
        self.store
            .find_board(id)
            .await?
            .ok_or_else(ServiceError::not_found)
    }

    /// Creates a board administered by the caller, who also becomes a member
    pub async fn create(&self, user: &AuthorizedUser, dto: CreateBoard) -> ServiceResult<Board> {
        let name = board_name(dto.name)?;
        if self.store.find_board_by_name(&name).await?.is_some() {
            return Err(duplicate(&name));
        }

        let id = self
            .store
            .insert_board(&name, user.id)
            .await
            .map_err(|e| conflict_or(e, &name))?;

        info!(board_id = id, user_id = user.id, "Board created");
        self.find(id).await
    }

    pub async fn update(&self, user: &AuthorizedUser, id: i64, dto: UpdateBoard) -> ServiceResult<Board> {
        let board = self.find(id).await?;
        require_board_admin(user, id)?;
        if dto.is_empty() {
            return Ok(board);
        }

        let name = board_name(dto.name)?;
        if let Some(existing) = self.store.find_board_by_name(&name).await? {
            if existing.id != id {
                return Err(duplicate(&name));
            }
        }

        self.store
            .update_board(id, &name)
            .await
            .map_err(|e| conflict_or(e, &name))?;

        info!(board_id = id, "Board updated");
        self.find(id).await
    }

    /// Deletes the board with its categories and records
    pub async fn delete(&self, user: &AuthorizedUser, id: i64) -> ServiceResult<Board> {
        let board = self.find(id).await?;
        require_board_admin(user, id)?;

        self.store.delete_board(id).await?;

        info!(board_id = id, user_id = user.id, "Board deleted");
        Ok(board)
    }

    pub async fn add_member(
        &self,
        user: &AuthorizedUser,
        board_id: i64,
        dto: AddMember,
    ) -> ServiceResult<Board> {
        self.find(board_id).await?;
        require_board_admin(user, board_id)?;

        let member_id = typed(dto.user_id, INVALID_VALUE)
            .and_then(required)
            .map_err(|m| ServiceError::field("userId", m))?;
        if self.store.find_user(member_id).await?.is_none() {
            return Err(ServiceError::field("userId", INVALID_VALUE));
        }

        self.store.add_board_member(board_id, member_id).await?;

        info!(board_id, member_id, "Board member added");
        self.find(board_id).await
    }

    /// Administrators remove anyone; members may only remove themselves
    pub async fn remove_member(
        &self,
        user: &AuthorizedUser,
        board_id: i64,
        member_id: i64,
    ) -> ServiceResult<Board> {
        self.find(board_id).await?;
        if !is_board_admin(user, board_id) && user.id != member_id {
            warn!(user_id = user.id, board_id, member_id, "Member removal denied");
            return Err(ServiceError::access_denied());
        }

        self.store.remove_board_member(board_id, member_id).await?;

        info!(board_id, member_id, "Board member removed");
        self.find(board_id).await
    }
}
