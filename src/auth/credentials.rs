//! Username/password verification
//!
//! Unknown username and wrong password both come back as
//! `AppError::InvalidCredentials`. An unknown username is still checked
//! against a dummy hash so both paths pay for one Argon2 run.

use crate::{
    auth::password::PasswordHasher, error::AppError, models::user::User,
    repository::UserStore,
};
use std::sync::Arc;

pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    dummy_hash: String,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<PasswordHasher>) -> Result<Self, AppError> {
        // Same work factor as real hashes, so the timing matches
        let dummy_hash = hasher.hash("dummy-password-for-unknown-users")?;

        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }

    pub async fn verify(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = self.users.find_by_username(username).await?;

        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(self.dummy_hash.as_str());
        let matched = self.hasher.verify(password, stored_hash);

        match user {
            Some(user) if matched => Ok(user),
            Some(user) => {
                tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                Err(AppError::InvalidCredentials)
            }
            None => {
                tracing::warn!("Login rejected: unknown username");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}
