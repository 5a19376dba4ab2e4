//! 用户资料的 HTTP 处理器
//!
//! The caller is always the `AuthContext` set by the JWT middleware.

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    handlers::RequestBody,
    middleware::AppState,
    models::{auth::ProfilePayload, user::UpdateProfileRequest},
    response::ApiResponse,
};
use axum::{extract::State, response::IntoResponse};
use std::sync::Arc;

/// 获取当前用户资料
pub async fn profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_service.profile(auth_context.user_id).await?;

    Ok(ApiResponse::ok("OK", ProfilePayload { user }))
}

/// 更新当前用户资料
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    RequestBody(req): RequestBody<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_service
        .update_profile(auth_context.user_id, req)
        .await?;

    Ok(ApiResponse::ok("User has been updated", ProfilePayload { user }))
}
