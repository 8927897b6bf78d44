/// Board endpoints
///
/// - `GET /v1/boards/search?id=&name=&isAdmin=&isMember=`
/// - `POST /v1/boards`
/// - `GET|PATCH|DELETE /v1/boards/:id`
/// - `POST /v1/boards/:id/members` `{ "userId": 2 }`
/// - `DELETE /v1/boards/:id/members/:user_id`

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{
        extract::{ApiJson, ApiPath},
        params::QueryParams,
    },
};
use axum::{
    extract::{Query, State},
    Json,
};
use budgetboard_shared::auth::middleware::AuthorizedUser;
use budgetboard_shared::models::board::{AddMember, Board, BoardFilter, CreateBoard, UpdateBoard};
use std::collections::HashMap;

pub async fn search(
    State(state): State<AppState>,
    user: AuthorizedUser,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Board>>> {
    let mut params = QueryParams::new(raw);
    let filter = BoardFilter {
        ids: params.ids("id"),
        name: params.text("name"),
        is_admin: params.boolean("isAdmin"),
        is_member: params.boolean("isMember"),
    };
    params.finish()?;

    Ok(Json(state.services.boards.search(&user, filter).await?))
}

pub async fn find(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Board>> {
    Ok(Json(state.services.boards.find(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthorizedUser,
    ApiJson(dto): ApiJson<CreateBoard>,
) -> ApiResult<Json<Board>> {
    Ok(Json(state.services.boards.create(&user, dto).await?))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<UpdateBoard>,
) -> ApiResult<Json<Board>> {
    Ok(Json(state.services.boards.update(&user, id, dto).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Board>> {
    Ok(Json(state.services.boards.delete(&user, id).await?))
}

pub async fn add_member(
    State(state): State<AppState>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<AddMember>,
) -> ApiResult<Json<Board>> {
    Ok(Json(state.services.boards.add_member(&user, id, dto).await?))
}

pub async fn remove_member(
    State(state): State<AppState>,
    user: AuthorizedUser,
    ApiPath((id, member_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<Board>> {
    Ok(Json(
        state
            .services
            .boards
            .remove_member(&user, id, member_id)
            .await?,
    ))
}
