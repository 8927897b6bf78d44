/// Group endpoints
///
/// Groups are shared by all users; the routes only require authentication.

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
use budgetboard_shared::models::group::{CreateGroup, Group, GroupFilter, UpdateGroup};
use std::collections::HashMap;

/// `GET /v1/groups/search?id=&subjectId=`
pub async fn search(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Group>>> {
    let mut params = QueryParams::new(raw);
    let filter = GroupFilter {
        ids: params.ids("id"),
        subject_ids: params.ids("subjectId"),
    };
    params.finish()?;

    Ok(Json(state.services.groups.search(filter).await?))
}

pub async fn find(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Group>> {
    Ok(Json(state.services.groups.find(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<CreateGroup>,
) -> ApiResult<Json<Group>> {
    Ok(Json(state.services.groups.create(dto).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<UpdateGroup>,
) -> ApiResult<Json<Group>> {
    Ok(Json(state.services.groups.update(id, dto).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Group>> {
    Ok(Json(state.services.groups.delete(id).await?))
}
