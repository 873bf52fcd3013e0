use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lessonhub_core::{Category, SubCategory};

use crate::api_error::ApiError;
use crate::auth::AdminUser;
use crate::extract::ApiJson;
use crate::query_types::{CreateCategoryRequest, CreateSubCategoryRequest};
use crate::validation::{validate_category_name, validate_sub_category};
use crate::AppState;

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.taxonomy_service.list_categories().await?))
}

pub async fn list_sub_categories(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<SubCategory>>, ApiError> {
    Ok(Json(state.taxonomy_service.list_sub_categories(&category_id).await?))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = validate_category_name(req.name)?;
    let category = state.taxonomy_service.create_category(&name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn create_sub_category(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<CreateSubCategoryRequest>,
) -> Result<(StatusCode, Json<SubCategory>), ApiError> {
    let (name, category_id) = validate_sub_category(req)?;
    let sub = state.taxonomy_service.create_sub_category(&name, &category_id).await?;
    Ok((StatusCode::CREATED, Json(sub)))
}
