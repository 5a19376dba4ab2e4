//! PostgreSQL 用户存储的启动流程
//!
//! `open_user_store` connects, applies `migrations/`, and refuses to start if
//! `users.username` is not backed by a unique index: registration relies on
//! that index to settle concurrent sign-ups for the same name.

use crate::{config::DatabaseConfig, repository::PgUserStore};
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Index definitions Postgres reports for the username uniqueness guarantee
const USERNAME_UNIQUE_INDEX_SQL: &str = r#"
    SELECT EXISTS (
        SELECT 1
        FROM pg_indexes
        WHERE schemaname = current_schema()
          AND tablename = 'users'
          AND indexdef LIKE 'CREATE UNIQUE INDEX%'
          AND indexdef LIKE '%(username)'
    )
"#;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Schema check failed: {0}")]
    SchemaCheckFailed(String),

    #[error("users.username has no unique index")]
    UsernameNotUnique,
}

/// 连接数据库、执行迁移并校验 users 表，返回可用的用户存储
pub async fn open_user_store(config: &DatabaseConfig) -> Result<PgUserStore, DbError> {
    let pool = create_pool(config).await?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "Migration failed");
        DbError::MigrationFailed(e.to_string())
    })?;

    verify_users_schema(&pool).await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "User store ready"
    );

    Ok(PgUserStore::new(pool))
}

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(config.url.expose_secret())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            DbError::ConnectionFailed(e.to_string())
        })
}

/// 校验 username 唯一索引存在
pub async fn verify_users_schema(pool: &PgPool) -> Result<(), DbError> {
    let has_unique_username: bool = sqlx::query_scalar(USERNAME_UNIQUE_INDEX_SQL)
        .fetch_one(pool)
        .await
        .map_err(|e| DbError::SchemaCheckFailed(e.to_string()))?;

    if !has_unique_username {
        tracing::error!("users.username is not unique; refusing to start");
        return Err(DbError::UsernameNotUnique);
    }

    Ok(())
}
