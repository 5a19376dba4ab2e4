//! 认证服务：注册、登录

use crate::{
    auth::{credentials::CredentialVerifier, jwt::JwtService, password::PasswordHasher},
    config::SecurityConfig,
    error::AppError,
    models::{auth::*, user::*},
    repository::UserStore,
};
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
    credentials: Arc<CredentialVerifier>,
    security: Arc<SecurityConfig>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
        credentials: Arc<CredentialVerifier>,
        security: Arc<SecurityConfig>,
    ) -> Self {
        Self {
            users,
            hasher,
            jwt_service,
            credentials,
            security,
        }
    }

    /// 用户注册
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthPayload, AppError> {
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.security)?;

        // 快速路径；真正的保证来自存储层的唯一约束
        if self.users.find_by_username(&req.username).await?.is_some() {
            tracing::info!(username = %req.username, "Registration rejected: username taken");
            return Err(AppError::DuplicateUsername);
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .users
            .insert(NewUser {
                name: req.name,
                username: req.username,
                password_hash,
            })
            .await
            .inspect_err(|e| {
                if matches!(e, AppError::DuplicateUsername) {
                    tracing::info!("Registration lost a race on username uniqueness");
                }
            })?;

        let token = self.jwt_service.issue(user.id)?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthPayload {
            user: UserResponse::from(user),
            token,
        })
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<AuthPayload, AppError> {
        req.validate()?;

        let user = self.credentials.verify(&req.username, &req.password).await?;

        let token = self.jwt_service.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthPayload {
            user: UserResponse::from(user),
            token,
        })
    }
}
