/// Category endpoints, mounted once per family
///
/// - `GET /v1/:family/categories/search?id=&boardId=&groupId=&typeId=`
/// - `POST /v1/:family/categories`
/// - `GET|PATCH|DELETE /v1/:family/categories/:id`

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
use budgetboard_shared::models::category::{Category, CategoryFilter, CreateCategory, UpdateCategory};
use budgetboard_shared::models::Family;
use std::collections::HashMap;

pub async fn search(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    Query(raw): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Category>>> {
    let mut params = QueryParams::new(raw);
    let filter = CategoryFilter {
        ids: params.ids("id"),
        board_ids: params.ids("boardId"),
        group_ids: params.ids("groupId"),
        type_ids: params.ids("typeId"),
    };
    params.finish()?;

    Ok(Json(state.services.categories(family).search(&user, filter).await?))
}

pub async fn find(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.services.categories(family).find(&user, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiJson(dto): ApiJson<CreateCategory>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.services.categories(family).create(&user, dto).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<UpdateCategory>,
) -> ApiResult<Json<Category>> {
    Ok(Json(
        state
            .services
            .categories(family)
            .update(&user, id, dto)
            .await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(family): Extension<Family>,
    user: AuthorizedUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.services.categories(family).delete(&user, id).await?))
}
