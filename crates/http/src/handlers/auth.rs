use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lessonhub_service::AuthSession;

use crate::api_error::ApiError;
use crate::auth::AuthUser;
use crate::extract::ApiJson;
use crate::query_types::{LoginRequest, RegisterRequest};
use crate::response_types::ProfileResponse;
use crate::validation::{validate_login, validate_register};
use crate::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let input = validate_register(req)?;
    let session = state.user_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let (phone, password) = validate_login(req)?;
    Ok(Json(state.user_service.login(&phone, &password).await?))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<StatusCode, ApiError> {
    state.user_service.logout(&auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn profile(auth: AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: auth.user })
}
