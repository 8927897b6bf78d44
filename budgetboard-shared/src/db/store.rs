/// Entity store abstraction
///
/// Services receive an `Arc<dyn Store>` and never touch SQL directly. Two
/// implementations exist:
///
/// - [`PgStore`](super::postgres::PgStore): PostgreSQL via sqlx
/// - [`MemoryStore`](super::memory::MemoryStore): in-process, for tests and
///   local runs
///
/// Both honor the same contract:
///
/// - `find_*` return `Ok(None)` for a missing row, never an error
/// - `search_*` apply every `Some` filter field conjunctively; a `Some` list
///   matches any of its values, an empty list matches nothing
/// - writes that break a uniqueness rule fail with
///   [`StoreError::UniqueViolation`](crate::error::StoreError::UniqueViolation)
/// - deleting a board removes its categories and records; deleting a
///   category removes its records; deleting a group detaches its categories
/// - category and record lookups are scoped to one [`Family`]

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::board::{Board, BoardFilter, BoardRef};
use crate::models::category::{Category, CategoryFilter, CategoryWrite, Family};
use crate::models::group::{Group, GroupFilter, GroupSubject, GroupWrite};
use crate::models::record::{Record, RecordFilter, RecordWrite};
use crate::models::reference::{CategoryType, Currency};
use crate::models::user::{BoardRoles, NewUser, User, UserFilter};

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness check
    async fn ping(&self) -> StoreResult<()>;

    // Users

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User>;

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Ordered by id ascending
    async fn search_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;

    async fn board_roles(&self, user_id: i64) -> StoreResult<BoardRoles>;

    // Boards

    /// Ordered by id ascending; `is_admin`/`is_member` are evaluated for
    /// `viewer_id`
    async fn search_boards(&self, filter: &BoardFilter, viewer_id: i64) -> StoreResult<Vec<Board>>;

    async fn find_board(&self, id: i64) -> StoreResult<Option<Board>>;

    async fn find_board_by_name(&self, name: &str) -> StoreResult<Option<BoardRef>>;

    /// Creates the board with `admin_id` as administrator and member
    async fn insert_board(&self, name: &str, admin_id: i64) -> StoreResult<i64>;

    async fn update_board(&self, id: i64, name: &str) -> StoreResult<()>;

    async fn delete_board(&self, id: i64) -> StoreResult<()>;

    /// No-op when already a member
    async fn add_board_member(&self, board_id: i64, user_id: i64) -> StoreResult<()>;

    async fn remove_board_member(&self, board_id: i64, user_id: i64) -> StoreResult<()>;

    // Reference data

    async fn list_category_types(&self) -> StoreResult<Vec<CategoryType>>;

    async fn find_category_type(&self, id: i64) -> StoreResult<Option<CategoryType>>;

    async fn list_currencies(&self) -> StoreResult<Vec<Currency>>;

    async fn find_currency(&self, slug: &str) -> StoreResult<Option<Currency>>;

    async fn list_group_subjects(&self) -> StoreResult<Vec<GroupSubject>>;

    async fn find_group_subject(&self, id: i64) -> StoreResult<Option<GroupSubject>>;

    // Groups

    /// Ordered by id ascending
    async fn search_groups(&self, filter: &GroupFilter) -> StoreResult<Vec<Group>>;

    async fn find_group(&self, id: i64) -> StoreResult<Option<Group>>;

    /// Group with this name in the subject, other than `exclude_id`
    async fn find_group_duplicate(
        &self,
        group: &GroupWrite,
        exclude_id: Option<i64>,
    ) -> StoreResult<Option<i64>>;

    async fn insert_group(&self, group: &GroupWrite) -> StoreResult<i64>;

    async fn update_group(&self, id: i64, group: &GroupWrite) -> StoreResult<()>;

    async fn delete_group(&self, id: i64) -> StoreResult<()>;

    // Categories

    /// Ordered by id ascending, then name
    async fn search_categories(
        &self,
        family: Family,
        filter: &CategoryFilter,
    ) -> StoreResult<Vec<Category>>;

    async fn find_category(&self, family: Family, id: i64) -> StoreResult<Option<Category>>;

    /// Category of the family in the same board with the same name and
    /// type/unit, other than `exclude_id`
    async fn find_category_duplicate(
        &self,
        family: Family,
        category: &CategoryWrite,
        exclude_id: Option<i64>,
    ) -> StoreResult<Option<i64>>;

    async fn insert_category(&self, family: Family, category: &CategoryWrite) -> StoreResult<i64>;

    async fn update_category(&self, id: i64, category: &CategoryWrite) -> StoreResult<()>;

    async fn delete_category(&self, id: i64) -> StoreResult<()>;

    // Records

    /// Ordered as described on [`RecordFilter`], then paged
    async fn search_records(&self, family: Family, filter: &RecordFilter)
        -> StoreResult<Vec<Record>>;

    async fn find_record(&self, family: Family, id: i64) -> StoreResult<Option<Record>>;

    async fn insert_record(&self, family: Family, record: &RecordWrite) -> StoreResult<i64>;

    async fn update_record(&self, id: i64, record: &RecordWrite) -> StoreResult<()>;

    async fn delete_record(&self, id: i64) -> StoreResult<()>;
}
