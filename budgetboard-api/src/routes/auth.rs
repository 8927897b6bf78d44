/// Authentication endpoints
///
/// - `POST /v1/auth/register` - Register a new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh the access token
/// - `GET /v1/auth/me` - Current user and board roles

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::extract::ApiJson,
};
use axum::{extract::State, Json};
use budgetboard_shared::{
    auth::{jwt, middleware::AuthorizedUser},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Required field."))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Required field."))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Required field."))]
    pub refresh_token: String,
}

/// Tokens issued on register and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub user: User,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

fn issue_tokens(user: User, secret: &str) -> ApiResult<TokenResponse> {
    let access = jwt::Claims::new(user.id, jwt::TokenType::Access);
    let refresh = jwt::Claims::new(user.id, jwt::TokenType::Refresh);

    Ok(TokenResponse {
        access_token: jwt::create_token(&access, secret)?,
        refresh_token: jwt::create_token(&refresh, secret)?,
        user,
    })
}

/// Register a new user
///
/// ```text
/// POST /v1/auth/register
/// { "username": "john_doe", "password": "Sup3r$ecret" }
/// ```
///
/// Username and password problems come back together as field errors.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUser>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state.services.users.create(req).await?;
    Ok(Json(issue_tokens(user, state.jwt_secret())?))
}

/// Login
///
/// ```text
/// POST /v1/auth/login
/// { "username": "john_doe", "password": "Sup3r$ecret" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: a field is empty
/// - `401 Unauthorized`: unknown user or wrong password
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = state
        .services
        .users
        .authenticate(&req.username, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password.".to_string()))?;

    Ok(Json(issue_tokens(user, state.jwt_secret())?))
}

/// Exchanges a refresh token for a new access token
///
/// ```text
/// POST /v1/auth/refresh
/// { "refreshToken": "eyJ..." }
/// ```
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    req.validate()?;

    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;
    Ok(Json(RefreshResponse { access_token }))
}

pub async fn me(user: AuthorizedUser) -> Json<AuthorizedUser> {
    Json(user)
}
