//! 测试公共模块
//! 提供测试辅助函数和测试工具

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use hello_api::{
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    db,
    middleware::AppState,
    repository::{InMemoryUserStore, UserStore},
    routes,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置
///
/// Argon2 cost is turned down so the suite stays fast.
pub fn create_test_config() -> AppConfig {
    let database_url =
        std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "memory://".to_string());

    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
        },
        database: DatabaseConfig {
            url: Secret::new(database_url),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_JWT_SECRET.to_string()),
            jwt_issuer: "hello-api-test".to_string(),
            token_ttl_secs: 300,
            password_min_length: 6,
            hash_memory_kib: 1024,
            hash_iterations: 1,
            hash_parallelism: 1,
        },
    }
}

/// 基于内存存储的测试应用
pub fn create_test_app() -> Router {
    create_test_app_with_store(Arc::new(InMemoryUserStore::new()))
}

pub fn create_test_app_with_store(users: Arc<dyn UserStore>) -> Router {
    let state = AppState::build(&create_test_config(), users).expect("Failed to build app state");
    routes::create_router(Arc::new(state))
}

/// 初始化测试数据库（需要 TEST_DATABASE_URL）
pub async fn setup_test_db() -> PgPool {
    let config = create_test_config();
    assert!(
        !config.database.is_in_memory(),
        "TEST_DATABASE_URL must point at a PostgreSQL database"
    );

    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    cleanup_test_db(&pool).await;

    pool
}

/// 清理测试数据
pub async fn cleanup_test_db(pool: &PgPool) {
    sqlx::query("TRUNCATE TABLE users")
        .execute(pool)
        .await
        .expect("Failed to cleanup test database");
}

/// 发送 JSON 请求，返回状态码和响应体
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send(app, request).await
}

/// 发送 application/x-www-form-urlencoded 请求
pub async fn send_form(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    form: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

/// 注册用户，返回 token
pub async fn register_user(app: &Router, name: &str, username: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/auth/register",
        None,
        Some(serde_json::json!({
            "name": name,
            "username": username,
            "password": password,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}
