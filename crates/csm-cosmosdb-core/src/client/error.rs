//! Errors raised by the Cosmos DB client and its builder

use serde::Deserialize;
use thiserror::Error;

/// Error type for client construction and REST calls
#[derive(Error, Debug)]
pub enum CosmosError {
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Invalid master key: {0}")]
    InvalidKey(String),

    #[error("Missing client setting: {0}")]
    MissingSetting(&'static str),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

/// Error body returned by the service
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl CosmosError {
    /// Map a non-success HTTP status and response body to an error
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                code: Some(code),
                message: Some(message),
            }) => format!("{}: {}", code, message),
            Ok(ErrorBody {
                message: Some(message),
                ..
            }) => message,
            _ if body.trim().is_empty() => format!("HTTP {}", status),
            _ => body.trim().to_string(),
        };

        match status {
            401 | 403 => CosmosError::AuthenticationFailed { message },
            404 => CosmosError::NotFound { message },
            409 => CosmosError::Conflict { message },
            429 => CosmosError::RateLimited { message },
            500..=599 => CosmosError::ServerError { status, message },
            _ => CosmosError::Api { status, message },
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CosmosError::NotFound { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CosmosError::AuthenticationFailed { .. })
    }

    /// Returns true if the builder rejected its settings
    #[must_use]
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            CosmosError::InvalidEndpoint { .. }
                | CosmosError::InvalidKey(_)
                | CosmosError::MissingSetting(_)
        )
    }

    /// Returns true if this error is potentially retryable.
    ///
    /// Nothing in this crate retries; callers that do can use this.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CosmosError::RateLimited { .. } | CosmosError::ServerError { .. } => true,
            CosmosError::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(CosmosError::from_status(404, "").is_not_found());
        assert!(CosmosError::from_status(401, "").is_unauthorized());
        assert!(CosmosError::from_status(403, "").is_unauthorized());
        assert!(matches!(
            CosmosError::from_status(409, ""),
            CosmosError::Conflict { .. }
        ));
        assert!(CosmosError::from_status(429, "").is_retryable());
        assert!(CosmosError::from_status(503, "").is_retryable());
        assert!(matches!(
            CosmosError::from_status(400, ""),
            CosmosError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_message_from_json_body() {
        let body = r#"{"code":"NotFound","message":"Resource Not Found"}"#;
        let err = CosmosError::from_status(404, body);
        assert_eq!(err.to_string(), "Not found: NotFound: Resource Not Found");
    }

    #[test]
    fn test_message_from_plain_body() {
        let err = CosmosError::from_status(400, "  bad things  ");
        assert_eq!(err.to_string(), "API error (HTTP 400): bad things");

        let err = CosmosError::from_status(502, "");
        assert_eq!(err.to_string(), "Server error (HTTP 502): HTTP 502");
    }

    #[test]
    fn test_misconfiguration_helpers() {
        assert!(CosmosError::InvalidKey("empty".to_string()).is_misconfiguration());
        assert!(CosmosError::MissingSetting("endpoint").is_misconfiguration());
        assert!(!CosmosError::MissingSetting("endpoint").is_retryable());
        assert!(!CosmosError::from_status(404, "").is_misconfiguration());
    }
}
