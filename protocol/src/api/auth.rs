//! Authentication DTOs

use serde::{Deserialize, Serialize};

/// Login request for POST /auth/login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub api_key: String,
}

/// Login response carrying the session identity
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in minutes.
    pub expires_in: i64,
    /// Refresh-token lifetime in hours.
    pub refresh_expires_in: i64,
    pub token_type: String,
    pub username: String,
    pub user_id: i64,
}

/// Refresh request for POST /auth/refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
    pub token_type: String,
}

/// Revoke request for POST /auth/revoke
#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeRefreshTokenRequest {
    pub refresh_token: String,
}
