/// Record endpoints, mounted once per family
///
/// ```text
/// GET /v1/finance/records/search?boardId=1&isTrashed=false&orderingByDate=ASC&skip=0&take=20
/// ```
///
/// Search parameters: `id`, `amount`, `date`, `categoryId`, `groupId`,
/// `boardId` (comma-separated lists), `isTrashed`, `skip`, `take`,
/// `orderingById`, `orderingByDate`.

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
    Extension, Json,
};
use budgetboard_shared::auth::middleware::AuthorizedUser;
use budgetboard_shared::models::record::{CreateRecord, Record, RecordFilter, UpdateRecord};
use budgetboard_shared::models::Family;
use std::collections::HashMap;

/// Typed filter from the raw query string
pub fn record_filter(raw: HashMap<String, String>) -> ApiResult<RecordFilter> {
    let mut params = QueryParams::new(raw);
    let filter = RecordFilter {
        ids: params.ids("id"),
        amounts: params.numbers("amount"),
        dates: params.dates("date"),
        category_ids: params.ids("categoryId"),
        group_ids: params.ids("groupId"),
        board_ids: params.ids("boardId"),
        is_trashed: params.boolean("isTrashed"),
        skip: params.count("skip"),
        take: params.count("take"),
        ordering_by_date: params.direction("orderingByDate"),
        ordering_by_id: params.direction("orderingById"),
    };
    params.finish()?;
    Ok(filter)
}

pub async fn search(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Record>>> {
    let filter = record_filter(raw)?;
    Ok(Json(state.services.records(family).search(&user, filter).await?))
}

pub async fn find(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Record>> {
    Ok(Json(state.services.records(family).find(&user, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiJson(dto): ApiJson<CreateRecord>,
) -> ApiResult<Json<Record>> {
    Ok(Json(state.services.records(family).create(&user, dto).await?))
}

/// Also moves records in and out of the trash via `isTrashed`
pub async fn update(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<UpdateRecord>,
) -> ApiResult<Json<Record>> {
    Ok(Json(state.services.records(family).update(&user, id, dto).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Record>> {
    Ok(Json(state.services.records(family).delete(&user, id).await?))
}
