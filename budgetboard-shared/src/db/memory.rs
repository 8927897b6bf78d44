/// In-process store
///
/// Mirrors [`PgStore`](super::postgres::PgStore) closely enough to run the
/// full service and HTTP test suites without a database: same orderings,
/// same cascades, same uniqueness rules, same seeded reference data (with
/// the ids the migration assigns).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use budgetboard_shared::db::memory::MemoryStore;
/// use budgetboard_shared::db::store::Store;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// assert_eq!(store.list_currencies().await?.len(), 3);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::store::Store;
use crate::error::{StoreError, StoreResult};
use crate::models::board::{Board, BoardFilter, BoardRef};
use crate::models::category::{Category, CategoryFilter, CategoryWrite, Family};
use crate::models::group::{Group, GroupFilter, GroupRef, GroupSubject, GroupWrite};
use crate::models::record::{Record, RecordFilter, RecordWrite, SortDirection};
use crate::models::reference::{CategoryType, Currency};
use crate::models::user::{BoardRoles, NewUser, User, UserFilter, UserRef};

#[derive(Debug, Default)]
struct Sequences {
    users: i64,
    boards: i64,
    groups: i64,
    categories: i64,
    records: i64,
}

fn next(sequence: &mut i64) -> i64 {
    *sequence += 1;
    *sequence
}

fn matches<T: PartialEq>(filter: &Option<Vec<T>>, value: &T) -> bool {
    filter.as_ref().map_or(true, |values| values.contains(value))
}

fn matches_opt<T: PartialEq>(filter: &Option<Vec<T>>, value: Option<&T>) -> bool {
    match (filter, value) {
        (None, _) => true,
        (Some(values), Some(value)) => values.contains(value),
        (Some(_), None) => false,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[derive(Debug, Default)]
struct Tables {
    seq: Sequences,
    users: BTreeMap<i64, User>,
    boards: BTreeMap<i64, String>,
    /// (board_id, user_id)
    administrators: BTreeSet<(i64, i64)>,
    /// (board_id, user_id)
    members: BTreeSet<(i64, i64)>,
    category_types: Vec<CategoryType>,
    currencies: Vec<Currency>,
    group_subjects: Vec<GroupSubject>,
    groups: BTreeMap<i64, GroupWrite>,
    categories: BTreeMap<i64, (Family, CategoryWrite)>,
    records: BTreeMap<i64, (Family, RecordWrite)>,
}

impl Tables {
    fn seeded() -> Self {
        let named = |names: &[&str]| -> Vec<(i64, String)> {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| (i as i64 + 1, name.to_string()))
                .collect()
        };

        Self {
            category_types: named(&["expense", "income"])
                .into_iter()
                .map(|(id, name)| CategoryType { id, name })
                .collect(),
            currencies: [
                ("eur", "Euro", "€"),
                ("gbp", "Pound sterling", "£"),
                ("usd", "United States dollar", "$"),
            ]
            .into_iter()
            .map(|(slug, name, symbol)| Currency {
                slug: slug.to_string(),
                name: name.to_string(),
                symbol: symbol.to_string(),
            })
            .collect(),
            group_subjects: named(&["finance", "budget", "activity"])
                .into_iter()
                .map(|(id, name)| GroupSubject { id, name })
                .collect(),
            ..Default::default()
        }
    }

    fn role_refs(&self, roles: &BTreeSet<(i64, i64)>, board_id: i64) -> Vec<UserRef> {
        roles
            .range((board_id, i64::MIN)..=(board_id, i64::MAX))
            .filter_map(|(_, user_id)| self.users.get(user_id).map(UserRef::from))
            .collect()
    }

    fn board(&self, id: i64) -> Option<Board> {
        let name = self.boards.get(&id)?;
        Some(Board {
            id,
            name: name.clone(),
            administrators: self.role_refs(&self.administrators, id),
            members: self.role_refs(&self.members, id),
        })
    }

    fn group(&self, id: i64) -> Option<Group> {
        let group = self.groups.get(&id)?;
        let subject = self
            .group_subjects
            .iter()
            .find(|s| s.id == group.subject_id)?
            .clone();
        Some(Group {
            id,
            name: group.name.clone(),
            subject,
        })
    }

    fn category(&self, id: i64) -> Option<Category> {
        let (family, row) = self.categories.get(&id)?;
        let board_name = self.boards.get(&row.board_id)?;
        let category_type = row
            .type_id
            .and_then(|type_id| self.category_types.iter().find(|t| t.id == type_id))
            .cloned();
        let group = row
            .group_id
            .and_then(|group_id| self.groups.get(&group_id).map(|g| (group_id, g)))
            .map(|(id, g)| GroupRef {
                id,
                name: g.name.clone(),
            });

        Some(Category {
            id,
            family: *family,
            name: row.name.clone(),
            board: BoardRef {
                id: row.board_id,
                name: board_name.clone(),
            },
            category_type,
            unit: row.unit.clone(),
            group,
        })
    }

    fn record(&self, id: i64) -> Option<Record> {
        let (family, row) = self.records.get(&id)?;
        let category = self.category(row.category_id)?;
        let currency = row
            .currency_slug
            .as_ref()
            .and_then(|slug| self.currencies.iter().find(|c| &c.slug == slug))
            .cloned();

        Some(Record {
            id,
            family: *family,
            amount: row.amount,
            date: row.date,
            comment: row.comment.clone(),
            is_trashed: row.is_trashed,
            category,
            currency,
        })
    }

    fn category_conflict(
        &self,
        family: Family,
        category: &CategoryWrite,
        exclude_id: Option<i64>,
    ) -> Option<i64> {
        self.categories
            .iter()
            .find(|(id, (f, c))| {
                Some(**id) != exclude_id
                    && *f == family
                    && c.board_id == category.board_id
                    && c.name == category.name
                    && c.type_id == category.type_id
                    && c.unit == category.unit
            })
            .map(|(id, _)| *id)
    }

    fn group_conflict(&self, group: &GroupWrite, exclude_id: Option<i64>) -> Option<i64> {
        self.groups
            .iter()
            .find(|(id, g)| {
                Some(**id) != exclude_id && g.subject_id == group.subject_id && g.name == group.name
            })
            .map(|(id, _)| *id)
    }

    fn board_name_taken(&self, name: &str, exclude_id: Option<i64>) -> bool {
        self.boards
            .iter()
            .any(|(id, n)| Some(*id) != exclude_id && n == name)
    }

    fn delete_category_rows(&mut self, category_ids: &BTreeSet<i64>) {
        self.records
            .retain(|_, (_, r)| !category_ids.contains(&r.category_id));
        self.categories.retain(|id, _| !category_ids.contains(id));
    }
}

/// [`Store`] held in memory behind a Tokio `RwLock`
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store with reference data seeded
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::seeded()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation("users_username_key".to_string()));
        }

        let id = next(&mut t.seq.users);
        let user = User {
            id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            created_at: Utc::now(),
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn search_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let t = self.tables.read().await;
        Ok(t.users
            .values()
            .filter(|u| matches(&filter.ids, &u.id) && matches(&filter.usernames, &u.username))
            .cloned()
            .collect())
    }

    async fn board_roles(&self, user_id: i64) -> StoreResult<BoardRoles> {
        let t = self.tables.read().await;
        let boards_of = |roles: &BTreeSet<(i64, i64)>| -> Vec<i64> {
            roles
                .iter()
                .filter(|(_, u)| *u == user_id)
                .map(|(b, _)| *b)
                .collect()
        };

        Ok(BoardRoles {
            administrated: boards_of(&t.administrators),
            member: boards_of(&t.members),
        })
    }

    async fn search_boards(&self, filter: &BoardFilter, viewer_id: i64) -> StoreResult<Vec<Board>> {
        let t = self.tables.read().await;
        let needle = filter.name.as_ref().map(|n| n.to_lowercase());

        Ok(t.boards
            .iter()
            .filter(|(id, name)| {
                matches(&filter.ids, *id)
                    && needle
                        .as_ref()
                        .map_or(true, |n| name.to_lowercase().contains(n.as_str()))
                    && filter
                        .is_admin
                        .map_or(true, |want| t.administrators.contains(&(**id, viewer_id)) == want)
                    && filter
                        .is_member
                        .map_or(true, |want| t.members.contains(&(**id, viewer_id)) == want)
            })
            .filter_map(|(id, _)| t.board(*id))
            .collect())
    }

    async fn find_board(&self, id: i64) -> StoreResult<Option<Board>> {
        Ok(self.tables.read().await.board(id))
    }

    async fn find_board_by_name(&self, name: &str) -> StoreResult<Option<BoardRef>> {
        let t = self.tables.read().await;
        Ok(t.boards
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, n)| BoardRef {
                id: *id,
                name: n.clone(),
            }))
    }

    async fn insert_board(&self, name: &str, admin_id: i64) -> StoreResult<i64> {
        let mut t = self.tables.write().await;
        if t.board_name_taken(name, None) {
            return Err(StoreError::UniqueViolation("boards_name_key".to_string()));
        }

        let id = next(&mut t.seq.boards);
        t.boards.insert(id, name.to_string());
        t.administrators.insert((id, admin_id));
        t.members.insert((id, admin_id));
        Ok(id)
    }

    async fn update_board(&self, id: i64, name: &str) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t.board_name_taken(name, Some(id)) {
            return Err(StoreError::UniqueViolation("boards_name_key".to_string()));
        }
        if let Some(board) = t.boards.get_mut(&id) {
            *board = name.to_string();
        }
        Ok(())
    }

    async fn delete_board(&self, id: i64) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        t.boards.remove(&id);
        t.administrators.retain(|(b, _)| *b != id);
        t.members.retain(|(b, _)| *b != id);

        let category_ids: BTreeSet<i64> = t
            .categories
            .iter()
            .filter(|(_, (_, c))| c.board_id == id)
            .map(|(cid, _)| *cid)
            .collect();
        t.delete_category_rows(&category_ids);
        Ok(())
    }

    async fn add_board_member(&self, board_id: i64, user_id: i64) -> StoreResult<()> {
        self.tables.write().await.members.insert((board_id, user_id));
        Ok(())
    }

    async fn remove_board_member(&self, board_id: i64, user_id: i64) -> StoreResult<()> {
        self.tables.write().await.members.remove(&(board_id, user_id));
        Ok(())
    }

    async fn list_category_types(&self) -> StoreResult<Vec<CategoryType>> {
        Ok(self.tables.read().await.category_types.clone())
    }

    async fn find_category_type(&self, id: i64) -> StoreResult<Option<CategoryType>> {
        let t = self.tables.read().await;
        Ok(t.category_types.iter().find(|c| c.id == id).cloned())
    }

    async fn list_currencies(&self) -> StoreResult<Vec<Currency>> {
        Ok(self.tables.read().await.currencies.clone())
    }

    async fn find_currency(&self, slug: &str) -> StoreResult<Option<Currency>> {
        let t = self.tables.read().await;
        Ok(t.currencies.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list_group_subjects(&self) -> StoreResult<Vec<GroupSubject>> {
        Ok(self.tables.read().await.group_subjects.clone())
    }

    async fn find_group_subject(&self, id: i64) -> StoreResult<Option<GroupSubject>> {
        let t = self.tables.read().await;
        Ok(t.group_subjects.iter().find(|s| s.id == id).cloned())
    }

    async fn search_groups(&self, filter: &GroupFilter) -> StoreResult<Vec<Group>> {
        let t = self.tables.read().await;
        Ok(t.groups
            .iter()
            .filter(|(id, g)| matches(&filter.ids, *id) && matches(&filter.subject_ids, &g.subject_id))
            .filter_map(|(id, _)| t.group(*id))
            .collect())
    }

    async fn find_group(&self, id: i64) -> StoreResult<Option<Group>> {
        Ok(self.tables.read().await.group(id))
    }

    async fn find_group_duplicate(
        &self,
        group: &GroupWrite,
        exclude_id: Option<i64>,
    ) -> StoreResult<Option<i64>> {
        Ok(self.tables.read().await.group_conflict(group, exclude_id))
    }

    async fn insert_group(&self, group: &GroupWrite) -> StoreResult<i64> {
        let mut t = self.tables.write().await;
        if t.group_conflict(group, None).is_some() {
            return Err(StoreError::UniqueViolation("groups_unique_in_subject".to_string()));
        }

        let id = next(&mut t.seq.groups);
        t.groups.insert(id, group.clone());
        Ok(id)
    }

    async fn update_group(&self, id: i64, group: &GroupWrite) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t.group_conflict(group, Some(id)).is_some() {
            return Err(StoreError::UniqueViolation("groups_unique_in_subject".to_string()));
        }
        if let Some(row) = t.groups.get_mut(&id) {
            *row = group.clone();
        }
        Ok(())
    }

    async fn delete_group(&self, id: i64) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        t.groups.remove(&id);
        for (_, category) in t.categories.values_mut() {
            if category.group_id == Some(id) {
                category.group_id = None;
            }
        }
        Ok(())
    }

    async fn search_categories(
        &self,
        family: Family,
        filter: &CategoryFilter,
    ) -> StoreResult<Vec<Category>> {
        let t = self.tables.read().await;
        Ok(t.categories
            .iter()
            .filter(|(id, (f, c))| {
                *f == family
                    && matches(&filter.ids, *id)
                    && matches(&filter.board_ids, &c.board_id)
                    && matches_opt(&filter.group_ids, c.group_id.as_ref())
                    && matches_opt(&filter.type_ids, c.type_id.as_ref())
            })
            .filter_map(|(id, _)| t.category(*id))
            .collect())
    }

    async fn find_category(&self, family: Family, id: i64) -> StoreResult<Option<Category>> {
        let t = self.tables.read().await;
        Ok(t.category(id).filter(|c| c.family == family))
    }

    async fn find_category_duplicate(
        &self,
        family: Family,
        category: &CategoryWrite,
        exclude_id: Option<i64>,
    ) -> StoreResult<Option<i64>> {
        Ok(self
            .tables
            .read()
            .await
            .category_conflict(family, category, exclude_id))
    }

    async fn insert_category(&self, family: Family, category: &CategoryWrite) -> StoreResult<i64> {
        let mut t = self.tables.write().await;
        if t.category_conflict(family, category, None).is_some() {
            return Err(StoreError::UniqueViolation("categories_unique_in_board".to_string()));
        }

        let id = next(&mut t.seq.categories);
        t.categories.insert(id, (family, category.clone()));
        Ok(id)
    }

    async fn update_category(&self, id: i64, category: &CategoryWrite) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        let family = match t.categories.get(&id) {
            Some((family, _)) => *family,
            None => return Ok(()),
        };
        if t.category_conflict(family, category, Some(id)).is_some() {
            return Err(StoreError::UniqueViolation("categories_unique_in_board".to_string()));
        }
        t.categories.insert(id, (family, category.clone()));
        Ok(())
    }

    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        t.delete_category_rows(&BTreeSet::from([id]));
        Ok(())
    }

    async fn search_records(
        &self,
        family: Family,
        filter: &RecordFilter,
    ) -> StoreResult<Vec<Record>> {
        let t = self.tables.read().await;

        let mut records: Vec<Record> = t
            .records
            .iter()
            .filter(|(id, (f, r))| {
                *f == family
                    && matches(&filter.ids, *id)
                    && matches(&filter.amounts, &r.amount)
                    && matches(&filter.dates, &r.date)
                    && matches(&filter.category_ids, &r.category_id)
                    && filter.is_trashed.map_or(true, |want| r.is_trashed == want)
            })
            .filter_map(|(id, _)| t.record(*id))
            .filter(|r| {
                matches(&filter.board_ids, &r.category.board.id)
                    && matches_opt(
                        &filter.group_ids,
                        r.category.group.as_ref().map(|g| &g.id),
                    )
            })
            .collect();

        let id_direction = filter.id_direction();
        records.sort_by(|a, b| {
            let by_id = directed(a.id.cmp(&b.id), id_direction);
            match filter.ordering_by_date {
                Some(direction) => directed(a.date.cmp(&b.date), direction).then(by_id),
                None => by_id,
            }
        });

        let skip = filter.skip.unwrap_or(0).max(0) as usize;
        let take = filter.take.map_or(usize::MAX, |n| n.max(0) as usize);
        Ok(records.into_iter().skip(skip).take(take).collect())
    }

    async fn find_record(&self, family: Family, id: i64) -> StoreResult<Option<Record>> {
        let t = self.tables.read().await;
        Ok(t.record(id).filter(|r| r.family == family))
    }

    async fn insert_record(&self, family: Family, record: &RecordWrite) -> StoreResult<i64> {
        let mut t = self.tables.write().await;
        let id = next(&mut t.seq.records);
        t.records.insert(id, (family, record.clone()));
        Ok(id)
    }

    async fn update_record(&self, id: i64, record: &RecordWrite) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if let Some((_, row)) = t.records.get_mut(&id) {
            *row = record.clone();
        }
        Ok(())
    }

    async fn delete_record(&self, id: i64) -> StoreResult<()> {
        self.tables.write().await.records.remove(&id);
        Ok(())
    }
}
