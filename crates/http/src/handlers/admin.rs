use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use lessonhub_core::PlatformStats;
use lessonhub_service::UserPage;

use crate::api_error::ApiError;
use crate::auth::AdminUser;
use crate::extract::ApiQuery;
use crate::query_types::UserListQuery;
use crate::response_types::DeleteUserResponse;
use crate::validation::validate_user_list;
use crate::AppState;

pub async fn stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<PlatformStats>, ApiError> {
    Ok(Json(state.admin_service.stats().await?))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<Json<UserPage>, ApiError> {
    let params = validate_user_list(query)?;
    Ok(Json(state.user_service.list_users(params).await?))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    state.user_service.delete_user(&id).await?;
    tracing::info!(admin_id = %admin.id, user_id = %id, "user deleted by admin");
    Ok(Json(DeleteUserResponse { deleted: true, id }))
}
