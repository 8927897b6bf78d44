/// Record service
///
/// One instance per [`Family`]. A record's board is its category's board, so
/// access checks go through the category. Budget records also need a
/// `currencySlug`.

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::authorization::{can_access_board, require_board_access, scope_board_ids};
use crate::auth::middleware::AuthorizedUser;
use crate::db::store::Store;
use crate::error::{FieldErrors, ServiceError, ServiceResult, INVALID_VALUE};
use crate::models::category::Family;
use crate::models::record::{CreateRecord, Record, RecordFilter, RecordWrite, UpdateRecord};
use crate::validation::{
    positive_amount, record_date, required, required_text, typed, DATE_FORMAT, SHOULD_BE_BOOLEAN,
    SHOULD_BE_POSITIVE, SHOULD_BE_TEXT,
};

#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn Store>,
    family: Family,
}

impl RecordService {
    pub fn new(store: Arc<dyn Store>, family: Family) -> Self {
        Self { store, family }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Records in accessible boards, filtered, ordered and paged
    pub async fn search(
        &self,
        user: &AuthorizedUser,
        filter: RecordFilter,
    ) -> ServiceResult<Vec<Record>> {
        debug!(family = %self.family, user_id = user.id, "Searching records");

        let filter = RecordFilter {
            board_ids: Some(scope_board_ids(user, filter.board_ids.as_deref())),
            ..filter
        };
        Ok(self.store.search_records(self.family, &filter).await?)
    }

    pub async fn find(&self, user: &AuthorizedUser, id: i64) -> ServiceResult<Record> {
        debug!(family = %self.family, record_id = id, user_id = user.id, "Finding record");

        let record = self
            .store
            .find_record(self.family, id)
            .await?
            .ok_or_else(ServiceError::not_found)?;
        require_board_access(user, record.category.board.id)?;
        Ok(record)
    }

    pub async fn create(&self, user: &AuthorizedUser, dto: CreateRecord) -> ServiceResult<Record> {
        debug!(family = %self.family, user_id = user.id, "Creating record");

        let mut errors = FieldErrors::new();
        let amount = errors.check(
            "amount",
            typed(dto.amount, SHOULD_BE_POSITIVE).and_then(positive_amount),
        );
        let category_id = errors.check(
            "categoryId",
            typed(dto.category_id, INVALID_VALUE).and_then(required),
        );
        let date = errors.check(
            "date",
            typed(dto.date, DATE_FORMAT).and_then(|raw| record_date(raw.as_deref())),
        );
        let currency_slug = if self.family.uses_currency() {
            errors
                .check(
                    "currencySlug",
                    typed(dto.currency_slug, SHOULD_BE_TEXT)
                        .and_then(|slug| required_text(slug.as_deref())),
                )
                .map(Some)
        } else {
            Some(None)
        };
        let comment = errors.check("comment", typed(dto.comment, SHOULD_BE_TEXT));

        let (amount, category_id, date, currency_slug, comment) =
            match (amount, category_id, date, currency_slug, comment) {
                (Some(a), Some(c), Some(d), Some(s), Some(m)) => (a, c, d, s, m),
                _ => return Err(ServiceError::BadRequest(errors)),
            };

        self.resolve_category(user, category_id).await?;
        self.resolve_currency(currency_slug.as_deref()).await?;

        let write = RecordWrite {
            category_id,
            amount,
            date,
            comment: comment.unwrap_or_default(),
            currency_slug,
            is_trashed: false,
        };
        let id = self.store.insert_record(self.family, &write).await?;

        info!(family = %self.family, record_id = id, category_id, "Record created");
        self.find(user, id).await
    }

    /// Applies the present fields; `isTrashed` moves the record in and out
    /// of the trash
    pub async fn update(
        &self,
        user: &AuthorizedUser,
        id: i64,
        dto: UpdateRecord,
    ) -> ServiceResult<Record> {
        let record = self.find(user, id).await?;
        if dto.is_empty() {
            return Ok(record);
        }

        let mut write = RecordWrite::from(&record);
        let mut errors = FieldErrors::new();

        if dto.amount.is_some() {
            let amount = typed(dto.amount, SHOULD_BE_POSITIVE).and_then(positive_amount);
            if let Some(amount) = errors.check("amount", amount) {
                write.amount = amount;
            }
        }
        if dto.date.is_some() {
            let date = typed(dto.date, DATE_FORMAT).and_then(|raw| record_date(raw.as_deref()));
            if let Some(date) = errors.check("date", date) {
                write.date = date;
            }
        }
        let category_id = errors
            .check("categoryId", typed(dto.category_id, INVALID_VALUE))
            .flatten();
        let currency_changed = self.family.uses_currency() && dto.currency_slug.is_some();
        if currency_changed {
            let slug = typed(dto.currency_slug, SHOULD_BE_TEXT)
                .and_then(|slug| required_text(slug.as_deref()));
            if let Some(slug) = errors.check("currencySlug", slug) {
                write.currency_slug = Some(slug);
            }
        }
        if let Some(Some(comment)) = errors.check("comment", typed(dto.comment, SHOULD_BE_TEXT)) {
            write.comment = comment;
        }
        if let Some(Some(is_trashed)) =
            errors.check("isTrashed", typed(dto.is_trashed, SHOULD_BE_BOOLEAN))
        {
            write.is_trashed = is_trashed;
        }
        errors.into_result()?;

        if let Some(category_id) = category_id {
            self.resolve_category(user, category_id).await?;
            write.category_id = category_id;
        }
        if currency_changed {
            self.resolve_currency(write.currency_slug.as_deref()).await?;
        }

        self.store.update_record(id, &write).await?;

        info!(family = %self.family, record_id = id, is_trashed = write.is_trashed, "Record updated");
        self.find(user, id).await
    }

    /// Removes the record for good; returns the deleted record
    pub async fn delete(&self, user: &AuthorizedUser, id: i64) -> ServiceResult<Record> {
        let record = self.find(user, id).await?;
        self.store.delete_record(id).await?;

        info!(family = %self.family, record_id = id, "Record deleted");
        Ok(record)
    }

    /// Category must exist in this family and sit in an accessible board
    async fn resolve_category(&self, user: &AuthorizedUser, category_id: i64) -> ServiceResult<()> {
        match self.store.find_category(self.family, category_id).await? {
            Some(category) if can_access_board(user, category.board.id) => Ok(()),
            _ => Err(ServiceError::field("categoryId", INVALID_VALUE)),
        }
    }

    async fn resolve_currency(&self, slug: Option<&str>) -> ServiceResult<()> {
        let Some(slug) = slug else {
            return Ok(());
        };
        match self.store.find_currency(slug).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::field("currencySlug", INVALID_VALUE)),
        }
    }
}
