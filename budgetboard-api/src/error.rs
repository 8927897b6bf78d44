/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`, which converts to an HTTP
/// status and one of two JSON bodies:
///
/// - field errors: `{"fields": {"amount": "Should be positive."}}`
/// - everything else: `{"message": "Access denied."}`
///
/// # Example
///
/// ```
/// use budgetboard_api::error::ApiResult;
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler() -> ApiResult<Json<Value>> {
///     Ok(Json(json!({ "status": "ok" })))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use budgetboard_shared::auth::jwt::JwtError;
use budgetboard_shared::auth::middleware::AuthError;
use budgetboard_shared::error::{FieldErrors, ServiceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred.";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Field validation failed (400)
    BadRequest(FieldErrors),

    /// Body or path could not be parsed at all (400)
    MalformedRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(fields) => write!(f, "Bad request: {}", fields),
            ApiError::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(fields) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message: None,
                    fields: Some(fields),
                },
            ),
            ApiError::MalformedRequest(msg) => (StatusCode::BAD_REQUEST, message(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, message(msg)),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, message(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, message(msg)),
            ApiError::InternalError(msg) => {
                // Details stay in the logs
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message(INTERNAL_MESSAGE.to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn message(msg: String) -> ErrorResponse {
    ErrorResponse {
        message: Some(msg),
        fields: None,
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::BadRequest(fields) => ApiError::BadRequest(fields),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Store(e) => ApiError::InternalError(e.to_string()),
            ServiceError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(e) => e.into(),
            AuthError::Store(e) => ApiError::InternalError(e.to_string()),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired.".to_string()),
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            _ => ApiError::Unauthorized("Invalid token.".to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

/// `validator` failures become field errors keyed by the camelCase field name
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errors) in errors.field_errors() {
            for error in errors {
                let msg = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value.".to_string());
                fields.insert(camel_case(field), msg);
            }
        }
        ApiError::BadRequest(fields)
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
