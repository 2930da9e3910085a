//! Unified error handling for csm-cosmosdb-core
//!
//! Wraps client and configuration errors with consistent helper methods.
//!
//! # Example
//!
//! ```rust
//! use csm_cosmosdb_core::{ConfigError, CoreError};
//!
//! let err: CoreError = ConfigError::missing("platform.azure.cosmos.core_database.name").into();
//! assert!(err.is_missing_config());
//! assert!(!err.is_retryable());
//! ```

use thiserror::Error;

use crate::client::CosmosError;
use crate::config::ConfigError;

/// Core error type for the wiring layer
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error from the Cosmos DB client or its builder
    #[error("Cosmos DB error: {0}")]
    Cosmos(#[from] CosmosError),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database probe failed for a reason other than a client error
    #[error("Probe failed: {0}")]
    Probe(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if a required configuration property was absent
    #[must_use]
    pub fn is_missing_config(&self) -> bool {
        matches!(self, CoreError::Config(ConfigError::MissingProperty { .. }))
    }

    /// Dotted key of the missing property, if that is what went wrong
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            CoreError::Config(ConfigError::MissingProperty { key }) => Some(key),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Cosmos(e) => e.is_not_found(),
            _ => false,
        }
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            CoreError::Cosmos(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Cosmos(e) => e.is_retryable(),
            _ => false,
        }
    }
}
