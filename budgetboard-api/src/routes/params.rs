/// Query string parsing
///
/// Search routes receive their filters as raw strings: id, amount and date
/// lists are comma-separated, flags are `true`/`false` and directions are
/// `ASC`/`DESC` in any case. [`QueryParams`] turns them into typed values,
/// collecting one message per malformed parameter. An empty value counts as
/// absent.

use budgetboard_shared::error::FieldErrors;
use budgetboard_shared::models::record::SortDirection;
use budgetboard_shared::validation::parse_date;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ApiError;

pub const INTEGER_LIST: &str = "Should be a list of integers.";
pub const NUMBER_LIST: &str = "Should be a list of numbers.";
pub const BOOLEAN: &str = "Should be a boolean.";
pub const DIRECTION: &str = "Should be ASC or DESC.";
pub const NON_NEGATIVE: &str = "Should be a non-negative integer.";

pub struct QueryParams {
    raw: HashMap<String, String>,
    errors: FieldErrors,
}

impl QueryParams {
    pub fn new(raw: HashMap<String, String>) -> Self {
        Self {
            raw,
            errors: FieldErrors::new(),
        }
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.raw
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn list<T>(&mut self, key: &str, parse: impl Fn(&str) -> Result<T, &'static str>) -> Option<Vec<T>> {
        let raw = self.value(key)?.to_string();
        let parsed: Result<Vec<T>, &'static str> = raw.split(',').map(|item| parse(item.trim())).collect();
        self.errors.check(key, parsed)
    }

    pub fn ids(&mut self, key: &str) -> Option<Vec<i64>> {
        self.list(key, |item| i64::from_str(item).map_err(|_| INTEGER_LIST))
    }

    pub fn numbers(&mut self, key: &str) -> Option<Vec<f64>> {
        self.list(key, |item| match f64::from_str(item) {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(NUMBER_LIST),
        })
    }

    pub fn dates(&mut self, key: &str) -> Option<Vec<NaiveDate>> {
        self.list(key, parse_date)
    }

    pub fn texts(&mut self, key: &str) -> Option<Vec<String>> {
        self.list(key, |item| Ok(item.to_string()))
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.value(key).map(str::to_string)
    }

    pub fn boolean(&mut self, key: &str) -> Option<bool> {
        let raw = self.value(key)?;
        let parsed = match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(BOOLEAN),
        };
        self.errors.check(key, parsed)
    }

    pub fn direction(&mut self, key: &str) -> Option<SortDirection> {
        let parsed = SortDirection::from_str(self.value(key)?).map_err(|_| DIRECTION);
        self.errors.check(key, parsed)
    }

    pub fn count(&mut self, key: &str) -> Option<i64> {
        let parsed = match i64::from_str(self.value(key)?) {
            Ok(n) if n >= 0 => Ok(n),
            _ => Err(NON_NEGATIVE),
        };
        self.errors.check(key, parsed)
    }

    /// Every parameter read so far parsed cleanly
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::BadRequest(self.errors))
        }
    }
}
