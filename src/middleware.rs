//! HTTP 中间件与应用状态
//! 请求追踪，以及在启动时一次性组装的服务依赖

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{CredentialVerifier, JwtService, PasswordHasher},
    config::AppConfig,
    error::AppError,
    repository::UserStore,
    services::{AuthService, UserService},
};

/// 应用状态
///
/// Every service is built once in [`AppState::build`] and shared read-only
/// across requests through `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: Arc<JwtService>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Composition root: wires hasher, token service, store, verifier and
    /// the services that use them.
    pub fn build(config: &AppConfig, users: Arc<dyn UserStore>) -> Result<Self, AppError> {
        let security = Arc::new(config.security.clone());

        let hasher = Arc::new(PasswordHasher::from_config(&security)?);
        let jwt_service = Arc::new(JwtService::from_config(&security)?);
        let credentials = Arc::new(CredentialVerifier::new(users.clone(), hasher.clone())?);

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            hasher.clone(),
            jwt_service.clone(),
            credentials,
            security.clone(),
        ));
        let user_service = Arc::new(UserService::new(users, hasher, security));

        Ok(Self {
            jwt_service,
            auth_service,
            user_service,
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "PATCH" => "PATCH",
            _ => "UNKNOWN",
        };
        metrics::counter!(
            "http_requests_total",
            "method" => method_name,
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        // 在响应头中回显 trace_id / request_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
