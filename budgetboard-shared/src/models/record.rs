/// Records
///
/// A record is one dated, positive amount in a category of the same family:
/// a finance transaction, a budget entry (with a currency) or an activity
/// log. Records are trashed by flipping `isTrashed` and removed for good by
/// `delete`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE records (
///     id BIGSERIAL PRIMARY KEY,
///     family record_family NOT NULL,
///     category_id BIGINT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
///     amount DOUBLE PRECISION NOT NULL CHECK (amount > 0),
///     date DATE NOT NULL,
///     comment TEXT NOT NULL DEFAULT '',
///     currency_slug VARCHAR(10) REFERENCES currencies(slug),
///     is_trashed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::{Category, Family};
use super::reference::Currency;
use crate::validation::Lenient;

/// Record with its category (and the category's joins) resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub family: Family,
    pub amount: f64,
    pub date: NaiveDate,
    pub comment: String,
    pub is_trashed: bool,
    pub category: Category,

    /// Budget only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

/// Record creation input
///
/// `date` stays a string and every field is [`Lenient`] so that a malformed
/// value becomes a field error rather than a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecord {
    pub amount: Option<Lenient<f64>>,
    pub category_id: Option<Lenient<i64>>,
    pub date: Option<Lenient<String>>,
    pub comment: Option<Lenient<String>>,
    pub currency_slug: Option<Lenient<String>>,
}

/// Partial record update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    pub amount: Option<Lenient<f64>>,
    pub date: Option<Lenient<String>>,
    pub category_id: Option<Lenient<i64>>,
    pub comment: Option<Lenient<String>>,
    pub is_trashed: Option<Lenient<bool>>,
    pub currency_slug: Option<Lenient<String>>,
}

impl UpdateRecord {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
            && self.comment.is_none()
            && self.is_trashed.is_none()
            && self.currency_slug.is_none()
    }
}

/// Complete, validated record row
#[derive(Debug, Clone, PartialEq)]
pub struct RecordWrite {
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub comment: String,
    pub currency_slug: Option<String>,
    pub is_trashed: bool,
}

impl From<&Record> for RecordWrite {
    fn from(record: &Record) -> Self {
        Self {
            category_id: record.category.id,
            amount: record.amount,
            date: record.date,
            comment: record.comment.clone(),
            currency_slug: record.currency.as_ref().map(|c| c.slug.clone()),
            is_trashed: record.is_trashed,
        }
    }
}

/// Sort direction for record ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = ();

    /// Case-insensitive `ASC` / `DESC`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(())
        }
    }
}

/// Record search filter
///
/// Without `ordering_by_date` records come back by id, descending unless
/// `ordering_by_id` says otherwise. With it, ties on the date are broken by
/// id, ascending unless `ordering_by_id` says otherwise. `skip` and `take`
/// apply after ordering.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub ids: Option<Vec<i64>>,
    pub amounts: Option<Vec<f64>>,
    pub dates: Option<Vec<NaiveDate>>,
    pub category_ids: Option<Vec<i64>>,
    pub group_ids: Option<Vec<i64>>,
    pub board_ids: Option<Vec<i64>>,
    pub is_trashed: Option<bool>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
    pub ordering_by_date: Option<SortDirection>,
    pub ordering_by_id: Option<SortDirection>,
}

impl RecordFilter {
    /// Direction applied to `id`, given whether a date ordering precedes it
    pub fn id_direction(&self) -> SortDirection {
        match (self.ordering_by_id, self.ordering_by_date) {
            (Some(direction), _) => direction,
            (None, Some(_)) => SortDirection::Asc,
            (None, None) => SortDirection::Desc,
        }
    }
}
