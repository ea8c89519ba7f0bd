//! Error bodies of the platform API.

use serde::{Deserialize, Serialize};

/// Error body returned by the platform API on non-2xx responses.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The main error message
    #[serde(alias = "message")]
    pub error: String,
    /// Optional additional details about the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with just a message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Creates a new error response with message and details.
    #[must_use]
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    /// Checks if this error response has details.
    #[must_use]
    pub const fn has_details(&self) -> bool {
        self.details.is_some()
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.error, details),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_new() {
        let error = ErrorResponse::new("Invalid credentials");
        assert_eq!(error.error, "Invalid credentials");
        assert!(!error.has_details());
        assert_eq!(error.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_error_response_with_details() {
        let error = ErrorResponse::with_details("Login failed", "account locked");
        assert!(error.has_details());
        assert_eq!(error.to_string(), "Login failed: account locked");
    }

    #[test]
    fn test_error_response_accepts_message_alias() {
        let error: ErrorResponse =
            serde_json::from_value(json!({ "message": "Not found" })).unwrap();
        assert_eq!(error.error, "Not found");
    }
}
