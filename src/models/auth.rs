//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserResponse;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Payload returned by login and register
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: UserResponse,
    pub token: String,
}

/// Payload returned by the profile endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfilePayload {
    pub user: UserResponse,
}
