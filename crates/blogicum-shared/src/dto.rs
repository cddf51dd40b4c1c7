//! Data Transfer Objects for the auth endpoints.

use serde::{Deserialize, Serialize};

/// Public view of a freshly registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    /// Where the client should go next, taken from `?next=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}
