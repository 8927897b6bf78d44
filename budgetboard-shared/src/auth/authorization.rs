/// Board-scoped authorization
///
/// Access to a category or record is decided by its board alone: a user who
/// administers the board or is a member of it may read and write everything
/// in it. Board management (rename, delete, membership) needs
/// administration.
///
/// These checks are pure functions of the [`AuthorizedUser`] snapshot; no
/// store round-trip is involved.
///
/// # Example
///
/// ```
/// use budgetboard_shared::auth::authorization::{can_access_board, is_board_admin};
/// use budgetboard_shared::auth::middleware::AuthorizedUser;
///
/// let user = AuthorizedUser {
///     id: 1,
///     username: "john_doe".to_string(),
///     administrated_boards: vec![1],
///     boards: vec![2],
/// };
///
/// assert!(can_access_board(&user, 1));
/// assert!(can_access_board(&user, 2));
/// assert!(!can_access_board(&user, 3));
/// assert!(!is_board_admin(&user, 2));
/// ```

use tracing::warn;

use super::middleware::AuthorizedUser;
use crate::error::ServiceError;

/// Authorization failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("User {user_id} cannot access board {board_id}")]
    NoBoardAccess { user_id: i64, board_id: i64 },

    #[error("User {user_id} does not administer board {board_id}")]
    NotBoardAdmin { user_id: i64, board_id: i64 },
}

impl From<AuthzError> for ServiceError {
    fn from(_: AuthzError) -> Self {
        ServiceError::access_denied()
    }
}

/// Member or administrator of the board
pub fn can_access_board(user: &AuthorizedUser, board_id: i64) -> bool {
    user.administrated_boards.contains(&board_id) || user.boards.contains(&board_id)
}

pub fn is_board_admin(user: &AuthorizedUser, board_id: i64) -> bool {
    user.administrated_boards.contains(&board_id)
}

/// Sorted, de-duplicated union of administrated and member boards
pub fn accessible_board_ids(user: &AuthorizedUser) -> Vec<i64> {
    let mut ids: Vec<i64> = user
        .administrated_boards
        .iter()
        .chain(user.boards.iter())
        .copied()
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Accessible boards, narrowed to `requested` when given
pub fn scope_board_ids(user: &AuthorizedUser, requested: Option<&[i64]>) -> Vec<i64> {
    let accessible = accessible_board_ids(user);
    match requested {
        Some(requested) => accessible
            .into_iter()
            .filter(|id| requested.contains(id))
            .collect(),
        None => accessible,
    }
}

pub fn require_board_access(user: &AuthorizedUser, board_id: i64) -> Result<(), AuthzError> {
    if can_access_board(user, board_id) {
        return Ok(());
    }
    warn!(user_id = user.id, board_id, "Board access denied");
    Err(AuthzError::NoBoardAccess {
        user_id: user.id,
        board_id,
    })
}

pub fn require_board_admin(user: &AuthorizedUser, board_id: i64) -> Result<(), AuthzError> {
    if is_board_admin(user, board_id) {
        return Ok(());
    }
    warn!(user_id = user.id, board_id, "Board administration denied");
    Err(AuthzError::NotBoardAdmin {
        user_id: user.id,
        board_id,
    })
}
