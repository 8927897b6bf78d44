/// PostgreSQL store
///
/// Filters use one static statement per search where every optional
/// predicate is written as `($n::type IS NULL OR column = ANY($n))`, so an
/// unset filter field binds `NULL` and drops out. Only the `ORDER BY` clause
/// of record searches is assembled at runtime, from [`SortDirection`]
/// keywords.
///
/// Joined entities are read as flat rows (`board_id`, `board_name`, ...) and
/// folded into the nested model types.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPool;
use std::collections::HashMap;

use super::pool;
use super::store::Store;
use crate::error::{StoreError, StoreResult};
use crate::models::board::{Board, BoardFilter, BoardRef};
use crate::models::category::{Category, CategoryFilter, CategoryWrite, Family};
use crate::models::group::{Group, GroupFilter, GroupRef, GroupSubject, GroupWrite};
use crate::models::record::{Record, RecordFilter, RecordWrite, SortDirection};
use crate::models::reference::{CategoryType, Currency};
use crate::models::user::{BoardRoles, NewUser, User, UserFilter, UserRef};

const UNIQUE_VIOLATION: &str = "23505";

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.family, c.name, c.unit,
           b.id AS board_id, b.name AS board_name,
           t.id AS type_id, t.name AS type_name,
           g.id AS group_id, g.name AS group_name
    FROM categories c
    JOIN boards b ON b.id = c.board_id
    LEFT JOIN category_types t ON t.id = c.type_id
    LEFT JOIN groups g ON g.id = c.group_id
"#;

const RECORD_SELECT: &str = r#"
    SELECT r.id, r.family, r.amount, r.date, r.comment, r.is_trashed,
           cur.slug AS currency_slug, cur.name AS currency_name, cur.symbol AS currency_symbol,
           c.id AS category_id, c.name AS category_name, c.unit AS category_unit,
           b.id AS board_id, b.name AS board_name,
           t.id AS type_id, t.name AS type_name,
           g.id AS group_id, g.name AS group_name
    FROM records r
    JOIN categories c ON c.id = r.category_id
    JOIN boards b ON b.id = c.board_id
    LEFT JOIN category_types t ON t.id = c.type_id
    LEFT JOIN groups g ON g.id = c.group_id
    LEFT JOIN currencies cur ON cur.slug = r.currency_slug
"#;

const GROUP_SELECT: &str = r#"
    SELECT g.id, g.name, s.id AS subject_id, s.name AS subject_name
    FROM groups g
    JOIN group_subjects s ON s.id = g.subject_id
"#;

/// sqlx-backed [`Store`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn load_boards(&self, refs: Vec<BoardRef>) -> StoreResult<Vec<Board>> {
        let ids: Vec<i64> = refs.iter().map(|b| b.id).collect();

        let admins: Vec<RoleRow> = sqlx::query_as(
            r#"
            SELECT ba.board_id, u.id AS user_id, u.username
            FROM board_administrators ba
            JOIN users u ON u.id = ba.user_id
            WHERE ba.board_id = ANY($1)
            ORDER BY u.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let members: Vec<RoleRow> = sqlx::query_as(
            r#"
            SELECT bm.board_id, u.id AS user_id, u.username
            FROM board_members bm
            JOIN users u ON u.id = bm.user_id
            WHERE bm.board_id = ANY($1)
            ORDER BY u.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut admins = group_roles(admins);
        let mut members = group_roles(members);

        Ok(refs
            .into_iter()
            .map(|board| Board {
                administrators: admins.remove(&board.id).unwrap_or_default(),
                members: members.remove(&board.id).unwrap_or_default(),
                id: board.id,
                name: board.name,
            })
            .collect())
    }
}

/// Maps a unique-constraint rejection to [`StoreError::UniqueViolation`]
fn write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return StoreError::UniqueViolation(constraint);
        }
    }
    StoreError::Database(e)
}

/// `%needle%` with LIKE wildcards escaped
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    board_id: i64,
    user_id: i64,
    username: String,
}

fn group_roles(rows: Vec<RoleRow>) -> HashMap<i64, Vec<UserRef>> {
    let mut by_board: HashMap<i64, Vec<UserRef>> = HashMap::new();
    for row in rows {
        by_board.entry(row.board_id).or_default().push(UserRef {
            id: row.user_id,
            username: row.username,
        });
    }
    by_board
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    family: Family,
    name: String,
    unit: Option<String>,
    board_id: i64,
    board_name: String,
    type_id: Option<i64>,
    type_name: Option<String>,
    group_id: Option<i64>,
    group_name: Option<String>,
}

fn joined_type(id: Option<i64>, name: Option<String>) -> Option<CategoryType> {
    Some(CategoryType { id: id?, name: name? })
}

fn joined_group(id: Option<i64>, name: Option<String>) -> Option<GroupRef> {
    Some(GroupRef { id: id?, name: name? })
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            family: row.family,
            name: row.name,
            board: BoardRef {
                id: row.board_id,
                name: row.board_name,
            },
            category_type: joined_type(row.type_id, row.type_name),
            unit: row.unit,
            group: joined_group(row.group_id, row.group_name),
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: i64,
    family: Family,
    amount: f64,
    date: NaiveDate,
    comment: String,
    is_trashed: bool,
    currency_slug: Option<String>,
    currency_name: Option<String>,
    currency_symbol: Option<String>,
    category_id: i64,
    category_name: String,
    category_unit: Option<String>,
    board_id: i64,
    board_name: String,
    type_id: Option<i64>,
    type_name: Option<String>,
    group_id: Option<i64>,
    group_name: Option<String>,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        let currency = match (row.currency_slug, row.currency_name, row.currency_symbol) {
            (Some(slug), Some(name), Some(symbol)) => Some(Currency { slug, name, symbol }),
            _ => None,
        };

        Record {
            id: row.id,
            family: row.family,
            amount: row.amount,
            date: row.date,
            comment: row.comment,
            is_trashed: row.is_trashed,
            category: Category {
                id: row.category_id,
                family: row.family,
                name: row.category_name,
                board: BoardRef {
                    id: row.board_id,
                    name: row.board_name,
                },
                category_type: joined_type(row.type_id, row.type_name),
                unit: row.category_unit,
                group: joined_group(row.group_id, row.group_name),
            },
            currency,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: i64,
    name: String,
    subject_id: i64,
    subject_name: String,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            subject: GroupSubject {
                id: row.subject_id,
                name: row.subject_name,
            },
        }
    }
}

fn record_order(filter: &RecordFilter) -> String {
    let id_direction = filter.id_direction().as_sql();
    match filter.ordering_by_date {
        Some(SortDirection::Asc) => format!("r.date ASC, r.id {}", id_direction),
        Some(SortDirection::Desc) => format!("r.date DESC, r.id {}", id_direction),
        None => format!("r.id {}", id_direction),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn search_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE ($1::bigint[] IS NULL OR id = ANY($1))
              AND ($2::text[] IS NULL OR username = ANY($2))
            ORDER BY id ASC
            "#,
        )
        .bind(filter.ids.as_deref())
        .bind(filter.usernames.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn board_roles(&self, user_id: i64) -> StoreResult<BoardRoles> {
        let administrated: Vec<i64> = sqlx::query_scalar(
            "SELECT board_id FROM board_administrators WHERE user_id = $1 ORDER BY board_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let member: Vec<i64> = sqlx::query_scalar(
            "SELECT board_id FROM board_members WHERE user_id = $1 ORDER BY board_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BoardRoles {
            administrated,
            member,
        })
    }

    async fn search_boards(&self, filter: &BoardFilter, viewer_id: i64) -> StoreResult<Vec<Board>> {
        let refs = sqlx::query_as::<_, BoardRef>(
            r#"
            SELECT b.id, b.name
            FROM boards b
            WHERE ($1::bigint[] IS NULL OR b.id = ANY($1))
              AND ($2::text IS NULL OR b.name ILIKE $2)
              AND ($3::boolean IS NULL OR $3 = EXISTS (
                    SELECT 1 FROM board_administrators ba
                    WHERE ba.board_id = b.id AND ba.user_id = $5))
              AND ($4::boolean IS NULL OR $4 = EXISTS (
                    SELECT 1 FROM board_members bm
                    WHERE bm.board_id = b.id AND bm.user_id = $5))
            ORDER BY b.id ASC
            "#,
        )
        .bind(filter.ids.as_deref())
        .bind(filter.name.as_deref().map(contains_pattern))
        .bind(filter.is_admin)
        .bind(filter.is_member)
        .bind(viewer_id)
        .fetch_all(&self.pool)
        .await?;

        self.load_boards(refs).await
    }

    async fn find_board(&self, id: i64) -> StoreResult<Option<Board>> {
        let board = sqlx::query_as::<_, BoardRef>("SELECT id, name FROM boards WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match board {
            Some(board) => Ok(self.load_boards(vec![board]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_board_by_name(&self, name: &str) -> StoreResult<Option<BoardRef>> {
        let board = sqlx::query_as::<_, BoardRef>("SELECT id, name FROM boards WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(board)
    }

    async fn insert_board(&self, name: &str, admin_id: i64) -> StoreResult<i64> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar("INSERT INTO boards (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .map_err(write_error)?;

        sqlx::query("INSERT INTO board_administrators (board_id, user_id) VALUES ($1, $2)")
            .bind(id)
            .bind(admin_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO board_members (board_id, user_id) VALUES ($1, $2)")
            .bind(id)
            .bind(admin_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update_board(&self, id: i64, name: &str) -> StoreResult<()> {
        sqlx::query("UPDATE boards SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn delete_board(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn add_board_member(&self, board_id: i64, user_id: i64) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO board_members (board_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (board_id, user_id) DO NOTHING
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_board_member(&self, board_id: i64, user_id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM board_members WHERE board_id = $1 AND user_id = $2")
            .bind(board_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_category_types(&self) -> StoreResult<Vec<CategoryType>> {
        let types = sqlx::query_as::<_, CategoryType>(
            "SELECT id, name FROM category_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    async fn find_category_type(&self, id: i64) -> StoreResult<Option<CategoryType>> {
        let category_type = sqlx::query_as::<_, CategoryType>(
            "SELECT id, name FROM category_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category_type)
    }

    async fn list_currencies(&self) -> StoreResult<Vec<Currency>> {
        let currencies = sqlx::query_as::<_, Currency>(
            "SELECT slug, name, symbol FROM currencies ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(currencies)
    }

    async fn find_currency(&self, slug: &str) -> StoreResult<Option<Currency>> {
        let currency = sqlx::query_as::<_, Currency>(
            "SELECT slug, name, symbol FROM currencies WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(currency)
    }

    async fn list_group_subjects(&self) -> StoreResult<Vec<GroupSubject>> {
        let subjects = sqlx::query_as::<_, GroupSubject>(
            "SELECT id, name FROM group_subjects ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    async fn find_group_subject(&self, id: i64) -> StoreResult<Option<GroupSubject>> {
        let subject = sqlx::query_as::<_, GroupSubject>(
            "SELECT id, name FROM group_subjects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    async fn search_groups(&self, filter: &GroupFilter) -> StoreResult<Vec<Group>> {
        let sql = format!(
            r#"{GROUP_SELECT}
            WHERE ($1::bigint[] IS NULL OR g.id = ANY($1))
              AND ($2::bigint[] IS NULL OR g.subject_id = ANY($2))
            ORDER BY g.id ASC"#
        );

        let rows = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(filter.ids.as_deref())
            .bind(filter.subject_ids.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn find_group(&self, id: i64) -> StoreResult<Option<Group>> {
        let sql = format!("{GROUP_SELECT} WHERE g.id = $1");

        let row = sqlx::query_as::<_, GroupRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Group::from))
    }

    async fn find_group_duplicate(
        &self,
        group: &GroupWrite,
        exclude_id: Option<i64>,
    ) -> StoreResult<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM groups
            WHERE subject_id = $1 AND name = $2
              AND ($3::bigint IS NULL OR id <> $3)
            LIMIT 1
            "#,
        )
        .bind(group.subject_id)
        .bind(&group.name)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn insert_group(&self, group: &GroupWrite) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO groups (name, subject_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(&group.name)
        .bind(group.subject_id)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)
    }

    async fn update_group(&self, id: i64, group: &GroupWrite) -> StoreResult<()> {
        sqlx::query("UPDATE groups SET name = $2, subject_id = $3 WHERE id = $1")
            .bind(id)
            .bind(&group.name)
            .bind(group.subject_id)
            .execute(&self.pool)
            .await
            .map_err(write_error)?;

        Ok(())
    }

    async fn delete_group(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn search_categories(
        &self,
        family: Family,
        filter: &CategoryFilter,
    ) -> StoreResult<Vec<Category>> {
        let sql = format!(
            r#"{CATEGORY_SELECT}
            WHERE c.family = $1
              AND ($2::bigint[] IS NULL OR c.id = ANY($2))
              AND ($3::bigint[] IS NULL OR c.board_id = ANY($3))
              AND ($4::bigint[] IS NULL OR c.group_id = ANY($4))
              AND ($5::bigint[] IS NULL OR c.type_id = ANY($5))
            ORDER BY c.id ASC, c.name ASC"#
        );

        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(family)
            .bind(filter.ids.as_deref())
            .bind(filter.board_ids.as_deref())
            .bind(filter.group_ids.as_deref())
            .bind(filter.type_ids.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_category(&self, family: Family, id: i64) -> StoreResult<Option<Category>> {
        let sql = format!("{CATEGORY_SELECT} WHERE c.family = $1 AND c.id = $2");

        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(family)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Category::from))
    }

    async fn find_category_duplicate(
        &self,
        family: Family,
        category: &CategoryWrite,
        exclude_id: Option<i64>,
    ) -> StoreResult<Option<i64>> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM categories
            WHERE family = $1 AND board_id = $2 AND name = $3
              AND COALESCE(type_id, 0) = COALESCE($4::bigint, 0)
              AND COALESCE(unit, '') = COALESCE($5::text, '')
              AND ($6::bigint IS NULL OR id <> $6)
            LIMIT 1
            "#,
        )
        .bind(family)
        .bind(category.board_id)
        .bind(&category.name)
        .bind(category.type_id)
        .bind(category.unit.as_deref())
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    async fn insert_category(&self, family: Family, category: &CategoryWrite) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO categories (family, name, board_id, type_id, unit, group_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(family)
        .bind(&category.name)
        .bind(category.board_id)
        .bind(category.type_id)
        .bind(category.unit.as_deref())
        .bind(category.group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)
    }

    async fn update_category(&self, id: i64, category: &CategoryWrite) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, board_id = $3, type_id = $4, unit = $5, group_id = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&category.name)
        .bind(category.board_id)
        .bind(category.type_id)
        .bind(category.unit.as_deref())
        .bind(category.group_id)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn search_records(
        &self,
        family: Family,
        filter: &RecordFilter,
    ) -> StoreResult<Vec<Record>> {
        let sql = format!(
            r#"{RECORD_SELECT}
            WHERE r.family = $1
              AND ($2::bigint[] IS NULL OR r.id = ANY($2))
              AND ($3::float8[] IS NULL OR r.amount = ANY($3))
              AND ($4::date[] IS NULL OR r.date = ANY($4))
              AND ($5::bigint[] IS NULL OR r.category_id = ANY($5))
              AND ($6::bigint[] IS NULL OR c.group_id = ANY($6))
              AND ($7::bigint[] IS NULL OR c.board_id = ANY($7))
              AND ($8::boolean IS NULL OR r.is_trashed = $8)
            ORDER BY {order}
            OFFSET $9 LIMIT $10"#,
            order = record_order(filter),
        );

        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(family)
            .bind(filter.ids.as_deref())
            .bind(filter.amounts.as_deref())
            .bind(filter.dates.as_deref())
            .bind(filter.category_ids.as_deref())
            .bind(filter.group_ids.as_deref())
            .bind(filter.board_ids.as_deref())
            .bind(filter.is_trashed)
            .bind(filter.skip)
            .bind(filter.take)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Record::from).collect())
    }

    async fn find_record(&self, family: Family, id: i64) -> StoreResult<Option<Record>> {
        let sql = format!("{RECORD_SELECT} WHERE r.family = $1 AND r.id = $2");

        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(family)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Record::from))
    }

    async fn insert_record(&self, family: Family, record: &RecordWrite) -> StoreResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO records (family, category_id, amount, date, comment, currency_slug, is_trashed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(family)
        .bind(record.category_id)
        .bind(record.amount)
        .bind(record.date)
        .bind(&record.comment)
        .bind(record.currency_slug.as_deref())
        .bind(record.is_trashed)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_record(&self, id: i64, record: &RecordWrite) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE records
            SET category_id = $2, amount = $3, date = $4, comment = $5,
                currency_slug = $6, is_trashed = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(record.category_id)
        .bind(record.amount)
        .bind(record.date)
        .bind(&record.comment)
        .bind(record.currency_slug.as_deref())
        .bind(record.is_trashed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_record(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("budget"), "%budget%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_record_order() {
        let mut filter = RecordFilter::default();
        assert_eq!(record_order(&filter), "r.id DESC");

        filter.ordering_by_date = Some(SortDirection::Asc);
        assert_eq!(record_order(&filter), "r.date ASC, r.id ASC");

        filter.ordering_by_id = Some(SortDirection::Desc);
        assert_eq!(record_order(&filter), "r.date ASC, r.id DESC");

        filter.ordering_by_date = None;
        assert_eq!(record_order(&filter), "r.id DESC");
    }

    #[test]
    fn test_joined_type_requires_both_columns() {
        assert_eq!(
            joined_type(Some(1), Some("expense".to_string())),
            Some(CategoryType {
                id: 1,
                name: "expense".to_string()
            })
        );
        assert_eq!(joined_type(None, None), None);
        assert_eq!(joined_type(Some(1), None), None);
    }
}
