/// Reference data listings

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use budgetboard_shared::models::group::GroupSubject;
use budgetboard_shared::models::reference::{CategoryType, Currency};

pub async fn category_types(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryType>>> {
    Ok(Json(state.services.reference.category_types().await?))
}

pub async fn currencies(State(state): State<AppState>) -> ApiResult<Json<Vec<Currency>>> {
    Ok(Json(state.services.reference.currencies().await?))
}

pub async fn group_subjects(State(state): State<AppState>) -> ApiResult<Json<Vec<GroupSubject>>> {
    Ok(Json(state.services.reference.group_subjects().await?))
}
