//! 用户资料服务：查看、更新

use crate::{
    auth::password::PasswordHasher,
    config::SecurityConfig,
    error::AppError,
    models::user::*,
    repository::UserStore,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    security: Arc<SecurityConfig>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        security: Arc<SecurityConfig>,
    ) -> Self {
        Self {
            users,
            hasher,
            security,
        }
    }

    /// Current user's profile. A valid token whose subject no longer
    /// exists is treated as an authentication failure.
    pub async fn profile(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(%user_id, "Token subject not found");
            AppError::Unauthorized
        })?;

        Ok(UserResponse::from(user))
    }

    /// Overwrite name and username; rehash only if a new password is given
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, AppError> {
        req.validate()?;

        let password_hash = match req.new_password() {
            Some(password) => {
                PasswordHasher::validate_password_policy(password, &self.security)?;
                Some(self.hasher.hash(password)?)
            }
            None => None,
        };
        let password_changed = password_hash.is_some();

        let user = self
            .users
            .update(
                user_id,
                UserChanges {
                    name: req.name,
                    username: req.username,
                    password_hash,
                },
            )
            .await?
            .ok_or_else(|| {
                tracing::warn!(%user_id, "Token subject not found");
                AppError::Unauthorized
            })?;

        tracing::info!(%user_id, password_changed, "Profile updated");

        Ok(UserResponse::from(user))
    }
}
