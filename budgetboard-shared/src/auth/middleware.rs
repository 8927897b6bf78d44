/// Authenticated-user context
///
/// Every authenticated request carries an [`AuthorizedUser`]: the user id,
/// the username and the two board id lists the authorization check needs.
/// The HTTP layer builds it once per request with [`authenticate`] and
/// stores it in the request extensions; handlers take it as an extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use super::jwt::{validate_access_token, JwtError};
use crate::db::store::Store;
use crate::error::StoreError;

/// User on whose behalf a service call runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedUser {
    pub id: i64,
    pub username: String,
    pub administrated_boards: Vec<i64>,
    pub boards: Vec<i64>,
}

impl AuthorizedUser {
    /// Loads the user and their board roles; `None` if the user is gone
    pub async fn load(store: &dyn Store, user_id: i64) -> Result<Option<Self>, StoreError> {
        let user = match store.find_user(user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        let roles = store.board_roles(user_id).await?;

        Ok(Some(Self {
            id: user.id,
            username: user.username,
            administrated_boards: roles.administrated,
            boards: roles.member,
        }))
    }
}

/// Authentication failure
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing credentials.")]
    MissingCredentials,

    #[error("Expected a Bearer token.")]
    InvalidFormat,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    /// Token is valid but its user no longer exists
    #[error("Unknown user.")]
    UnknownUser,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::InvalidToken(JwtError::Expired) => {
                (StatusCode::UNAUTHORIZED, "Token expired.".to_string())
            }
            AuthError::Store(e) => {
                tracing::error!(error = %e, "Store failure during authentication");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred.".to_string(),
                )
            }
            other => (StatusCode::UNAUTHORIZED, other.to_string()),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Resolves an `Authorization` header value to the calling user
///
/// # Errors
///
/// - `MissingCredentials` when the header is absent
/// - `InvalidFormat` when it is not `Bearer <token>`
/// - `InvalidToken` when the token is not a valid access token
/// - `UnknownUser` when the token's user does not exist
pub async fn authenticate(
    store: &dyn Store,
    secret: &str,
    authorization: Option<&str>,
) -> Result<AuthorizedUser, AuthError> {
    let header = authorization.ok_or(AuthError::MissingCredentials)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_access_token(token, secret)?;

    AuthorizedUser::load(store, claims.sub)
        .await?
        .ok_or(AuthError::UnknownUser)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizedUser>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}
