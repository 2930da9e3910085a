//! Error types for csm-cosmosdb
//!
//! Structured errors with suggestions, printed as cargo-style diagnostics.

use colored::Colorize;
use csm_cosmosdb_core::{ConfigError, CoreError, CosmosError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: missing configuration property 'platform.azure.cosmos.core_database.name'
///
///   tip: set it in the config file
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for tip in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", tip);
        }
    }
}

/// Main error type for the csm-cosmosdb binary
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Missing configuration property '{key}'")]
    MissingProperty { key: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cosmos DB client could not be created: {message}")]
    ClientSetup { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cosmos DB error: {message}")]
    Cosmos { message: String },

    #[error("Core database '{database}' is not healthy: {detail}")]
    Unhealthy { database: String, detail: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for csm-cosmosdb operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Environment variable that overrides a config key, if any
fn env_var_for(key: &str) -> Option<&'static str> {
    match key {
        "platform.cosmosdb.enable" => Some("CSM_PLATFORM_COSMOSDB_ENABLE"),
        "platform.azure.cosmos.uri" => Some("CSM_PLATFORM_AZURE_COSMOS_URI"),
        "platform.azure.cosmos.key" => Some("CSM_PLATFORM_AZURE_COSMOS_KEY"),
        "platform.azure.cosmos.core_database.name" => {
            Some("CSM_PLATFORM_AZURE_COSMOS_CORE_DATABASE_NAME")
        }
        _ => None,
    }
}

impl CliError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            CliError::MissingProperty { key } => {
                let mut tips = vec![format!(
                    "Set '{}' in the config file (see: csm-cosmosdb config path)",
                    key
                )];
                if let Some(var) = env_var_for(key) {
                    tips.push(format!(
                        "Or export {} (ignored when --config-file is given)",
                        var
                    ));
                } else if key == "platform.azure.cosmos" {
                    tips.push(
                        "Or export CSM_PLATFORM_AZURE_COSMOS_URI and CSM_PLATFORM_AZURE_COSMOS_KEY"
                            .to_string(),
                    );
                }
                tips.push(
                    "Set platform.cosmosdb.enable = false if this deployment has no Cosmos DB"
                        .to_string(),
                );
                tips
            }
            CliError::ClientSetup { .. } => vec![
                "Check platform.azure.cosmos.uri is an http(s) URL".to_string(),
                "Check platform.azure.cosmos.key is the base64 account master key".to_string(),
            ],
            CliError::AuthenticationFailed { .. } => vec![
                "Verify the master key matches the account at platform.azure.cosmos.uri"
                    .to_string(),
                "Check the system clock; signed requests are time sensitive".to_string(),
            ],
            CliError::Unhealthy { database, .. } => vec![
                format!("Verify database '{}' exists in the account", database),
                "Run with -vv for request details".to_string(),
            ],
            CliError::FileError { path, .. } => vec![
                format!("Check that the path is writable: {}", path),
                "Use --force to overwrite an existing file".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingProperty { key } => CliError::MissingProperty { key },
            other => CliError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

impl From<CosmosError> for CliError {
    fn from(err: CosmosError) -> Self {
        if err.is_misconfiguration() {
            CliError::ClientSetup {
                message: err.to_string(),
            }
        } else if err.is_unauthorized() {
            CliError::AuthenticationFailed {
                message: err.to_string(),
            }
        } else {
            CliError::Cosmos {
                message: err.to_string(),
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(config_err) => CliError::from(config_err),
            CoreError::Cosmos(cosmos_err) => CliError::from(cosmos_err),
            CoreError::Probe(message) => CliError::Cosmos { message },
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::OutputError {
            message: format!("YAML error: {}", err),
        }
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::OutputError {
            message: format!("TOML error: {}", err),
        }
    }
}
