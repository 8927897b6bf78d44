/// Common error types
///
/// Every service operation returns [`ServiceResult`]. Failures are raised at
/// the point of detection and propagate unrecovered to the HTTP boundary,
/// which maps them to a status code and a stable JSON body:
///
/// - [`ServiceError::BadRequest`] → `400 {"fields": {"amount": "Should be positive."}}`
/// - [`ServiceError::Forbidden`] → `403 {"message": "Access denied."}`
/// - [`ServiceError::NotFound`] → `404 {"message": "Not found."}`
/// - [`ServiceError::Store`] / [`ServiceError::Internal`] → `500`, details are
///   only logged
///
/// # Example
///
/// ```
/// use budgetboard_shared::error::{FieldErrors, ServiceError};
///
/// let mut errors = FieldErrors::new();
/// errors.insert("amount", "Should be positive.");
/// errors.insert("date", "Should have format YYYY-MM-DD.");
///
/// let err = errors.into_result().unwrap_err();
/// assert!(matches!(err, ServiceError::BadRequest(ref fields) if fields.len() == 2));
/// ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Message for an absent or empty required field
pub const REQUIRED_FIELD: &str = "Required field.";

/// Message for a foreign reference that cannot be resolved
pub const INVALID_VALUE: &str = "Invalid value.";

/// Message for any board-scoped access denial
pub const ACCESS_DENIED: &str = "Access denied.";

/// Message for a missing entity
pub const NOT_FOUND: &str = "Not found.";

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Field name → human-readable message
///
/// Ordered so that serialized bodies are stable between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map holding a single field error
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Records a message for a field, keeping the first message if the
    /// field already failed
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Records the error side of a field check and passes the value through
    pub fn check<T>(&mut self, field: &str, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(field, message);
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when nothing failed, otherwise a BadRequest carrying every
    /// collected message
    pub fn into_result(self) -> ServiceResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::BadRequest(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Error type for entity store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// One or more fields failed validation
    #[error("Bad request: {0}")]
    BadRequest(FieldErrors),

    /// Caller is neither member nor administrator of the owning board
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failure outside the store, e.g. password hashing
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::BadRequest(FieldErrors::single(field, message))
    }

    pub fn access_denied() -> Self {
        ServiceError::Forbidden(ACCESS_DENIED.to_string())
    }

    pub fn not_found() -> Self {
        ServiceError::NotFound(NOT_FOUND.to_string())
    }
}
