//! Error types for the docqa client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform failure shape for every backend call.
///
/// HTTP failures carry the response status; transport and decoding failures
/// carry `status: None`. Callers never see the underlying transport error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable message, taken from the response body when available.
    pub message: String,
    /// HTTP status code, if a response was received.
    pub status: Option<u16>,
}

impl ApiError {
    /// Creates an error for a received HTTP response.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates an error for a request that never produced a response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// True when the backend rejected the credential (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

/// A shared error type for the docqa client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocqaError {
    /// Input rejected client-side; never sent to the backend.
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Backend or transport failure.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A conversation command was issued with no document selected.
    #[error("No document is selected")]
    NoActiveConversation,

    /// Durable client storage failure (session records).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocqaError {
    /// Creates a Validation error
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns the backend error, if this wraps one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DocqaError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for DocqaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(format!("JSON: {}", err))
    }
}

/// A type alias for `Result<T, DocqaError>`.
pub type Result<T> = std::result::Result<T, DocqaError>;

/// A type alias for gateway results.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_unauthorized() {
        assert!(ApiError::http(401, "Token expired").is_unauthorized());
        assert!(!ApiError::http(500, "boom").is_unauthorized());
        assert!(!ApiError::transport("connection refused").is_unauthorized());
    }

    #[test]
    fn test_api_error_converts_into_docqa_error() {
        let err: DocqaError = ApiError::http(400, "Question is required").into();
        assert_eq!(
            err.as_api().map(|e| e.status),
            Some(Some(400)),
        );
        assert_eq!(err.to_string(), "API error: Question is required");
    }

    #[test]
    fn test_validation_display() {
        let err = DocqaError::validation("email", "Email is required");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid email: Email is required");
    }
}
