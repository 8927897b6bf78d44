/// Per-field checks
///
/// Each check takes the raw optional input of one DTO field and returns the
/// parsed value or the message to show next to that field. Services feed the
/// results into [`FieldErrors::check`](crate::error::FieldErrors::check) so
/// that every failing field is reported in one response.
///
/// # Example
///
/// ```
/// use budgetboard_shared::error::FieldErrors;
/// use budgetboard_shared::validation::{positive_amount, record_date};
///
/// let mut errors = FieldErrors::new();
/// let amount = errors.check("amount", positive_amount(Some(-20.5)));
/// let date = errors.check("date", record_date(Some("2022|08|05")));
///
/// assert!(amount.is_none() && date.is_none());
/// assert_eq!(errors.get("amount"), Some("Should be positive."));
/// assert_eq!(errors.get("date"), Some("Should have format YYYY-MM-DD."));
/// ```

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::REQUIRED_FIELD;

pub const SHOULD_BE_POSITIVE: &str = "Should be positive.";
pub const DATE_FORMAT: &str = "Should have format YYYY-MM-DD.";
pub const DATE_NOT_ON_CALENDAR: &str = "Should be a valid date.";
pub const USERNAME_LENGTH: &str = "Should be between 3 and 50 characters.";
pub const USERNAME_CHARSET: &str =
    "Should contain only letters, digits, dots, dashes and underscores.";
pub const SHOULD_BE_TEXT: &str = "Should be a string.";
pub const SHOULD_BE_BOOLEAN: &str = "Should be a boolean.";
pub const NAME_TOO_LONG: &str = "Should be at most 100 characters.";
pub const UNIT_TOO_LONG: &str = "Should be at most 50 characters.";

/// Column widths of `name` and `unit`
pub const NAME_MAX_CHARS: usize = 100;
pub const UNIT_MAX_CHARS: usize = 50;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("username pattern compiles"));

/// DTO field that accepts any JSON type
///
/// A value of the wrong type deserializes to [`Lenient::Malformed`] instead
/// of failing the whole body, so it can be reported next to the other field
/// errors. `null` and absent keys are `None` on the surrounding `Option`.
#[derive(Debug, Clone, PartialEq)]
pub enum Lenient<T> {
    Value(T),
    Malformed,
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Value(value)
    }
}

impl<'de, T> Deserialize<'de> for Lenient<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(raw).map_or(Lenient::Malformed, Lenient::Value))
    }
}

/// Unwraps a lenient field; a malformed value fails with `message`
pub fn typed<T>(value: Option<Lenient<T>>, message: &'static str) -> Result<Option<T>, &'static str> {
    match value {
        None => Ok(None),
        Some(Lenient::Value(value)) => Ok(Some(value)),
        Some(Lenient::Malformed) => Err(message),
    }
}

/// Present value of any type
pub fn required<T>(value: Option<T>) -> Result<T, &'static str> {
    value.ok_or(REQUIRED_FIELD)
}

/// Present, non-blank text; surrounding whitespace is trimmed
pub fn required_text(value: Option<&str>) -> Result<String, &'static str> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(REQUIRED_FIELD),
    }
}

/// Present, non-blank text of at most `max` characters
pub fn bounded_text(
    value: Option<&str>,
    max: usize,
    too_long: &'static str,
) -> Result<String, &'static str> {
    let text = required_text(value)?;
    if text.chars().count() > max {
        return Err(too_long);
    }
    Ok(text)
}

/// Board, category or group name
pub fn entity_name(value: Option<&str>) -> Result<String, &'static str> {
    bounded_text(value, NAME_MAX_CHARS, NAME_TOO_LONG)
}

/// Activity category unit
pub fn unit(value: Option<&str>) -> Result<String, &'static str> {
    bounded_text(value, UNIT_MAX_CHARS, UNIT_TOO_LONG)
}

/// Strictly positive, finite amount
pub fn positive_amount(value: Option<f64>) -> Result<f64, &'static str> {
    let amount = required(value)?;
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(SHOULD_BE_POSITIVE)
    }
}

/// Calendar date written as `YYYY-MM-DD`
pub fn record_date(value: Option<&str>) -> Result<NaiveDate, &'static str> {
    let raw = match value {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(REQUIRED_FIELD),
    };
    parse_date(raw)
}

/// Parses a `YYYY-MM-DD` string without the presence check
pub fn parse_date(raw: &str) -> Result<NaiveDate, &'static str> {
    if !DATE_RE.is_match(raw) {
        return Err(DATE_FORMAT);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DATE_NOT_ON_CALENDAR)
}

/// Account name: 3 to 50 characters from a restricted set
pub fn username(value: Option<&str>) -> Result<String, &'static str> {
    let name = required_text(value)?;
    let len = name.chars().count();
    if !(3..=50).contains(&len) {
        return Err(USERNAME_LENGTH);
    }
    if !USERNAME_RE.is_match(&name) {
        return Err(USERNAME_CHARSET);
    }
    Ok(name)
}
