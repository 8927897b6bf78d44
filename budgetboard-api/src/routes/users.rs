/// User lookup endpoints
///
/// - `GET /v1/users/search?id=1,2&username=john_doe`
/// - `GET /v1/users/:identifier` - numeric id or username

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{extract::ApiPath, params::QueryParams},
};
use axum::{
    extract::{Query, State},
    Json,
};
use budgetboard_shared::models::user::{User, UserFilter};
use std::collections::HashMap;

pub async fn search(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<User>>> {
    let mut params = QueryParams::new(raw);
    let filter = UserFilter {
        ids: params.ids("id"),
        usernames: params.texts("username"),
    };
    params.finish()?;

    Ok(Json(state.services.users.search(filter).await?))
}

pub async fn find(
    State(state): State<AppState>,
    ApiPath(identifier): ApiPath<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.services.users.find(&identifier).await?))
}
