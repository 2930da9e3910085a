//! Configuration errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    SaveError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A property the enabled module needs is absent or blank
    #[error("Missing required configuration property '{key}'")]
    MissingProperty { key: String },

    #[error("Invalid value '{value}' for configuration property '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("Failed to resolve master key: {0}")]
    CredentialError(String),

    #[error("No home directory to place the config file in")]
    ConfigDirError,
}

impl ConfigError {
    /// Shorthand for a [`ConfigError::MissingProperty`] on the given dotted key
    pub fn missing(key: impl Into<String>) -> Self {
        ConfigError::MissingProperty { key: key.into() }
    }

    pub fn invalid(key: impl Into<String>, value: impl ToString) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
