/// Category service
///
/// One instance per [`Family`]. Finance and budget categories need a
/// `typeId`; activity categories need a `unit`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use budgetboard_shared::auth::middleware::AuthorizedUser;
/// use budgetboard_shared::db::memory::MemoryStore;
/// use budgetboard_shared::error::ServiceError;
/// use budgetboard_shared::models::category::CreateCategory;
/// use budgetboard_shared::models::Family;
/// use budgetboard_shared::services::CategoryService;
///
/// # async fn example() {
/// let service = CategoryService::new(Arc::new(MemoryStore::new()), Family::Activity);
/// let user = AuthorizedUser {
///     id: 1,
///     username: "john_doe".to_string(),
///     administrated_boards: vec![],
///     boards: vec![],
/// };
///
/// let err = service.create(&user, CreateCategory::default()).await.unwrap_err();
/// if let ServiceError::BadRequest(fields) = err {
///     assert_eq!(fields.get("name"), Some("Required field."));
///     assert_eq!(fields.get("boardId"), Some("Required field."));
///     assert_eq!(fields.get("unit"), Some("Required field."));
/// }
/// # }
/// ```

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::authorization::{can_access_board, require_board_access, scope_board_ids};
use crate::auth::middleware::AuthorizedUser;
use crate::db::store::Store;
use crate::error::{FieldErrors, ServiceError, ServiceResult, StoreError, INVALID_VALUE};
use crate::models::category::{Category, CategoryFilter, CategoryWrite, CreateCategory, Family, UpdateCategory};
use crate::validation::{self, entity_name, required, typed, SHOULD_BE_TEXT};

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn Store>,
    family: Family,
}

/// Classifier field of the family: `typeId` or `unit`
enum Classifier {
    Type(i64),
    Unit(String),
}

/// Field after its JSON type check; `Err` holds the mismatch message
type Checked<T> = Result<Option<T>, &'static str>;

/// Category fields as submitted (create) or merged over the stored row
/// (update), before presence, length and reference checks
struct CategoryInput {
    name: Checked<String>,
    board_id: Checked<i64>,
    type_id: Checked<i64>,
    unit: Checked<String>,
    group_id: Checked<i64>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn Store>, family: Family) -> Self {
        Self { store, family }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Categories of accessible boards, narrowed by the filter
    pub async fn search(
        &self,
        user: &AuthorizedUser,
        filter: CategoryFilter,
    ) -> ServiceResult<Vec<Category>> {
        debug!(family = %self.family, user_id = user.id, "Searching categories");

        let filter = CategoryFilter {
            board_ids: Some(scope_board_ids(user, filter.board_ids.as_deref())),
            ..filter
        };
        Ok(self.store.search_categories(self.family, &filter).await?)
    }

    pub async fn find(&self, user: &AuthorizedUser, id: i64) -> ServiceResult<Category> {
        debug!(family = %self.family, category_id = id, user_id = user.id, "Finding category");

        let category = self
            .store
            .find_category(self.family, id)
            .await?
            .ok_or_else(ServiceError::not_found)?;
        require_board_access(user, category.board.id)?;
        Ok(category)
    }

    pub async fn create(
        &self,
        user: &AuthorizedUser,
        dto: CreateCategory,
    ) -> ServiceResult<Category> {
        debug!(family = %self.family, user_id = user.id, "Creating category");

        let input = CategoryInput {
            name: typed(dto.name, SHOULD_BE_TEXT),
            board_id: typed(dto.board_id, INVALID_VALUE),
            type_id: typed(dto.type_id, INVALID_VALUE),
            unit: typed(dto.unit, SHOULD_BE_TEXT),
            group_id: typed(dto.group_id, INVALID_VALUE),
        };
        let write = self.validate(user, input).await?;
        self.ensure_unique(&write, None).await?;

        let id = self
            .store
            .insert_category(self.family, &write)
            .await
            .map_err(|e| self.conflict_or(e, &write))?;

        info!(family = %self.family, category_id = id, board_id = write.board_id, "Category created");
        self.find(user, id).await
    }

    /// Applies the present fields; `groupId: null` detaches the group
    pub async fn update(
        &self,
        user: &AuthorizedUser,
        id: i64,
        dto: UpdateCategory,
    ) -> ServiceResult<Category> {
        let category = self.find(user, id).await?;
        if dto.is_empty() {
            return Ok(category);
        }

        let current = CategoryWrite::from(&category);
        let input = CategoryInput {
            name: typed(dto.name, SHOULD_BE_TEXT).map(|name| name.or(Some(current.name))),
            board_id: typed(dto.board_id, INVALID_VALUE).map(|id| id.or(Some(current.board_id))),
            type_id: typed(dto.type_id, INVALID_VALUE).map(|id| id.or(current.type_id)),
            unit: typed(dto.unit, SHOULD_BE_TEXT).map(|unit| unit.or(current.unit)),
            group_id: match dto.group_id {
                None => Ok(current.group_id),
                Some(group_id) => typed(group_id, INVALID_VALUE),
            },
        };
        let write = self.validate(user, input).await?;
        self.ensure_unique(&write, Some(id)).await?;

        self.store
            .update_category(id, &write)
            .await
            .map_err(|e| self.conflict_or(e, &write))?;

        info!(family = %self.family, category_id = id, "Category updated");
        self.find(user, id).await
    }

    /// Deletes the category and its records; returns the deleted category
    pub async fn delete(&self, user: &AuthorizedUser, id: i64) -> ServiceResult<Category> {
        let category = self.find(user, id).await?;
        self.store.delete_category(id).await?;

        info!(family = %self.family, category_id = id, "Category deleted");
        Ok(category)
    }

    async fn validate(
        &self,
        user: &AuthorizedUser,
        input: CategoryInput,
    ) -> ServiceResult<CategoryWrite> {
        let mut errors = FieldErrors::new();
        let name = errors.check(
            "name",
            input.name.and_then(|name| entity_name(name.as_deref())),
        );
        let board_id = errors.check("boardId", input.board_id.and_then(required));
        let classifier = if self.family.uses_unit() {
            errors
                .check(
                    "unit",
                    input.unit.and_then(|unit| validation::unit(unit.as_deref())),
                )
                .map(Classifier::Unit)
        } else {
            errors
                .check("typeId", input.type_id.and_then(required))
                .map(Classifier::Type)
        };
        let group_id = errors.check("groupId", input.group_id);

        let (name, board_id, classifier, group_id) = match (name, board_id, classifier, group_id) {
            (Some(name), Some(board_id), Some(classifier), Some(group_id)) => {
                (name, board_id, classifier, group_id)
            }
            _ => return Err(ServiceError::BadRequest(errors)),
        };

        let board = self.store.find_board(board_id).await?;
        if board.is_none() || !can_access_board(user, board_id) {
            return Err(ServiceError::field("boardId", INVALID_VALUE));
        }

        let (type_id, unit) = match classifier {
            Classifier::Type(type_id) => {
                if self.store.find_category_type(type_id).await?.is_none() {
                    return Err(ServiceError::field("typeId", INVALID_VALUE));
                }
                (Some(type_id), None)
            }
            Classifier::Unit(unit) => (None, Some(unit)),
        };

        if let Some(group_id) = group_id {
            if self.store.find_group(group_id).await?.is_none() {
                return Err(ServiceError::field("groupId", INVALID_VALUE));
            }
        }

        Ok(CategoryWrite {
            name,
            board_id,
            type_id,
            unit,
            group_id,
        })
    }

    async fn ensure_unique(&self, write: &CategoryWrite, exclude_id: Option<i64>) -> ServiceResult<()> {
        match self
            .store
            .find_category_duplicate(self.family, write, exclude_id)
            .await?
        {
            Some(_) => Err(self.duplicate(write)),
            None => Ok(()),
        }
    }

    fn duplicate(&self, write: &CategoryWrite) -> ServiceError {
        let message = format!("\"{}\" category already exists in this board.", write.name);
        let classifier = if self.family.uses_unit() { "unit" } else { "typeId" };

        let mut errors = FieldErrors::new();
        for field in ["boardId", "name", classifier] {
            errors.insert(field, message.clone());
        }
        ServiceError::BadRequest(errors)
    }

    /// A unique-index rejection means a concurrent insert won the race
    fn conflict_or(&self, e: StoreError, write: &CategoryWrite) -> ServiceError {
        match e {
            StoreError::UniqueViolation(_) => self.duplicate(write),
            other => other.into(),
        }
    }
}
