use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use lessonhub_core::PromptView;

use crate::api_error::ApiError;
use crate::auth::{AdminUser, AuthUser};
use crate::extract::ApiJson;
use crate::query_types::CreatePromptRequest;
use crate::validation::validate_prompt;
use crate::AppState;

pub async fn create_prompt(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreatePromptRequest>,
) -> Result<(StatusCode, Json<PromptView>), ApiError> {
    let input = validate_prompt(auth.user.id, req)?;
    let view = state.prompt_service.submit(input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn my_prompts(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<PromptView>>, ApiError> {
    Ok(Json(state.prompt_service.list_for_user(&auth.user.id).await?))
}

pub async fn user_prompts(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PromptView>>, ApiError> {
    Ok(Json(state.prompt_service.list_for_user(&user_id).await?))
}
