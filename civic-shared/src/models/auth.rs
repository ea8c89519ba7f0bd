//! Authentication payloads.

use serde::{Deserialize, Serialize};

use super::User;

/// Credentials posted to any of the login endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email, trimmed.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// The signed-in account.
    pub user: User,
}

/// Body returned by the identity endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeResponse {
    /// The account behind the session cookie.
    pub user: User,
}

/// Self-service sign up for public users and volunteers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Optional contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Token from the verification email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyEmailRequest {
    /// Opaque token from the link.
    pub token: String,
}
