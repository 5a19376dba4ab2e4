//! 认证相关的 HTTP 处理器

use crate::{
    error::AppError,
    handlers::RequestBody,
    middleware::AppState,
    models::{auth::*, user::RegisterRequest},
    response::ApiResponse,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// 用户登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    RequestBody(req): RequestBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = state.auth_service.login(req).await?;

    Ok(ApiResponse::ok("OK", payload))
}

/// 用户注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    RequestBody(req): RequestBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = state.auth_service.register(req).await?;

    Ok((StatusCode::CREATED, ApiResponse::ok("OK", payload)))
}
