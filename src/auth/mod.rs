//! Authentication module

pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use credentials::CredentialVerifier;
pub use jwt::{Claims, JwtService, TokenError};
pub use middleware::{extract_token, jwt_auth_middleware, AuthContext};
pub use password::{PasswordError, PasswordHasher};
