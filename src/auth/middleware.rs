//! JWT 认证中间件
//!
//! Requests reach a protected handler only after the bearer token has been
//! validated; the resolved subject is attached as an `AuthContext` extension.

use crate::{auth::jwt::JwtService, error::AppError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌
///
/// A leading `Bearer ` scheme is stripped case-insensitively; a bare token is
/// accepted as-is. Absent, non-ASCII or blank headers yield `None`.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    // to_str() only succeeds on visible ASCII, so byte slicing is safe
    let token = match value.get(..6) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case("bearer")
                && value[6..].chars().next().map_or(true, char::is_whitespace) =>
        {
            value[6..].trim()
        }
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(req.headers()) else {
        tracing::debug!("Rejected request without bearer token");
        return Err(AppError::Unauthorized);
    };

    let claims = jwt_service.validate(token).map_err(|e| {
        tracing::warn!(reason = %e, "Rejected bearer token");
        AppError::from(e)
    })?;

    tracing::debug!(user_id = %claims.sub, "Bearer token accepted");
    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}
