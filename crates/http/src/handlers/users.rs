use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use lessonhub_core::User;

use crate::api_error::ApiError;
use crate::auth::AuthUser;
use crate::AppState;

pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.get_user(&id).await?))
}
