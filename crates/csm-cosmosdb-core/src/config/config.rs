//! Configuration management for the Cosmos DB wiring layer
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format and mirrors the platform property
//! tree (`platform.cosmosdb.*`, `platform.azure.cosmos.*`).

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::credential::{is_keyring_reference, resolve_credential};
use super::error::{ConfigError, Result};

/// Dotted key of the core database name, used in error reporting
pub const CORE_DATABASE_NAME_KEY: &str = "platform.azure.cosmos.core_database.name";

const COSMOS_KEY: &str = "platform.azure.cosmos";
const URI_KEY: &str = "platform.azure.cosmos.uri";
const MASTER_KEY_KEY: &str = "platform.azure.cosmos.key";
const REQUEST_TIMEOUT_KEY: &str = "platform.azure.cosmos.request_timeout_secs";

const ENV_ENABLE: &str = "CSM_PLATFORM_COSMOSDB_ENABLE";
const ENV_URI: &str = "CSM_PLATFORM_AZURE_COSMOS_URI";
const ENV_KEY: &str = "CSM_PLATFORM_AZURE_COSMOS_KEY";
const ENV_CORE_DATABASE_NAME: &str = "CSM_PLATFORM_AZURE_COSMOS_CORE_DATABASE_NAME";

/// Template written by `config init`
pub const CONFIG_TEMPLATE: &str = r#"# csm-cosmosdb configuration

[platform.cosmosdb]
# Build the Cosmos DB client at startup
enable = false

[platform.azure.cosmos]
uri = "${CSM_COSMOS_URI:-https://localhost:8081/}"
# Base64 master key. Use "keyring:<name>" with the secure-storage feature.
key = "${CSM_COSMOS_KEY}"
consistency_level = "session"
request_timeout_secs = 30

[platform.azure.cosmos.core_database]
name = "phoenix-core"
"#;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Platform property tree
    #[serde(default)]
    pub platform: PlatformProperties,
}

/// Platform properties consumed by the wiring layer
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct PlatformProperties {
    /// Feature flag section
    #[serde(default)]
    pub cosmosdb: CosmosDbToggle,
    /// Azure section, absent when the platform is not deployed on Azure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureProperties>,
}

/// Feature flag gating the whole module
#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub struct CosmosDbToggle {
    #[serde(default)]
    pub enable: bool,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct AzureProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cosmos: Option<CosmosProperties>,
}

/// Connection settings for the Cosmos DB account.
///
/// Every field is optional in the file. `uri` and `key` are only required
/// once the module is enabled, and are checked when the client is built.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CosmosProperties {
    /// Account endpoint, e.g. `https://account.documents.azure.com:443/`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Base64 master key, or a `keyring:` reference
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default)]
    pub core_database: CoreDatabase,
    #[serde(default)]
    pub consistency_level: ConsistencyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent_suffix: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct CoreDatabase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Consistency level requested on every call
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    Strong,
    BoundedStaleness,
    #[default]
    Session,
    ConsistentPrefix,
    Eventual,
}

impl ConsistencyLevel {
    /// Value of the `x-ms-consistency-level` header
    pub fn as_header(&self) -> &'static str {
        match self {
            ConsistencyLevel::Strong => "Strong",
            ConsistencyLevel::BoundedStaleness => "BoundedStaleness",
            ConsistencyLevel::Session => "Session",
            ConsistencyLevel::ConsistentPrefix => "ConsistentPrefix",
            ConsistencyLevel::Eventual => "Eventual",
        }
    }
}

impl std::fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_header())
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for CosmosProperties {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl CosmosProperties {
    /// Create properties for an endpoint and key with defaults for everything else
    pub fn new(uri: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            key: key.into(),
            core_database: CoreDatabase::default(),
            consistency_level: ConsistencyLevel::default(),
            user_agent_suffix: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Name of the core database. Empty or blank names count as missing.
    pub fn core_database_name(&self) -> Result<&str> {
        self.core_database
            .name
            .as_deref()
            .and_then(non_blank)
            .ok_or_else(|| ConfigError::missing(CORE_DATABASE_NAME_KEY))
    }

    /// Account endpoint. Blank counts as missing.
    pub fn endpoint(&self) -> Result<&str> {
        non_blank(&self.uri).ok_or_else(|| ConfigError::missing(URI_KEY))
    }

    /// Resolve the master key, following `keyring:` references
    pub fn resolve_key(&self) -> Result<String> {
        let key = non_blank(&self.key).ok_or_else(|| ConfigError::missing(MASTER_KEY_KEY))?;
        resolve_credential(key)
    }

    /// Per-request timeout. Zero is rejected.
    pub fn request_timeout(&self) -> Result<Duration> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                REQUEST_TIMEOUT_KEY,
                self.request_timeout_secs,
            ));
        }
        Ok(Duration::from_secs(self.request_timeout_secs))
    }

    /// Copy of these properties safe to print
    pub fn masked(&self) -> Self {
        let key = if is_keyring_reference(&self.key) {
            self.key.clone()
        } else if self.key.is_empty() {
            String::new()
        } else {
            "********".to_string()
        };
        Self {
            key,
            ..self.clone()
        }
    }
}

impl PlatformProperties {
    /// Whether the Cosmos DB module is switched on
    pub fn is_enabled(&self) -> bool {
        self.cosmosdb.enable
    }

    /// The `platform.azure.cosmos` section
    pub fn cosmos(&self) -> Result<&CosmosProperties> {
        self.azure
            .as_ref()
            .and_then(|azure| azure.cosmos.as_ref())
            .ok_or_else(|| ConfigError::missing(COSMOS_KEY))
    }

    /// Core database name. A missing `azure` or `cosmos` section reports the
    /// full key of the name, since that is what the caller was after.
    pub fn core_database_name(&self) -> Result<&str> {
        self.azure
            .as_ref()
            .and_then(|azure| azure.cosmos.as_ref())
            .ok_or_else(|| ConfigError::missing(CORE_DATABASE_NAME_KEY))?
            .core_database_name()
    }

    fn cosmos_mut(&mut self) -> Option<&mut CosmosProperties> {
        self.azure.as_mut().and_then(|azure| azure.cosmos.as_mut())
    }
}

impl Config {
    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration content, expanding environment variables first
    pub fn from_toml(content: &str) -> Result<Self> {
        let expanded_content = Self::expand_env_vars(content);
        let config: Config = toml::from_str(&expanded_content)?;
        Ok(config)
    }

    /// Load the effective configuration.
    ///
    /// An explicit path is used as-is. Otherwise the standard location is
    /// loaded and `CSM_PLATFORM_*` environment variables are layered on top.
    pub fn load_effective(explicit_path: Option<&Path>) -> Result<Self> {
        match explicit_path {
            Some(path) => {
                debug!("Explicit config path given, ignoring environment overrides");
                Self::load_from_path(path)
            }
            None => {
                let mut config = Self::load()?;
                config.apply_env_overrides()?;
                Ok(config)
            }
        }
    }

    /// Apply `CSM_PLATFORM_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_with(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ENABLE) {
            debug!("Found {} environment variable", ENV_ENABLE);
            self.platform.cosmosdb.enable = parse_flag(ENV_ENABLE, &value)?;
        }

        let uri = lookup(ENV_URI);
        let key = lookup(ENV_KEY);
        let name = lookup(ENV_CORE_DATABASE_NAME);

        if uri.is_none() && key.is_none() && name.is_none() {
            return Ok(());
        }

        let azure = self.platform.azure.get_or_insert_with(AzureProperties::default);
        let cosmos = azure.cosmos.get_or_insert_with(|| {
            debug!("Creating cosmos section from environment variables");
            CosmosProperties::default()
        });

        if let Some(uri) = uri {
            debug!("Found {} environment variable", ENV_URI);
            cosmos.uri = uri;
        }
        if let Some(key) = key {
            debug!("Found {} environment variable", ENV_KEY);
            cosmos.key = key;
        }
        if let Some(name) = name {
            debug!("Found {} environment variable", ENV_CORE_DATABASE_NAME);
            cosmos.core_database.name = Some(name);
        }

        Ok(())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Copy of this configuration with the master key masked
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if let Some(cosmos) = masked.platform.cosmos_mut() {
            *cosmos = cosmos.masked();
        }
        masked
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, this supports both the standard macOS path and Linux-style ~/.config path:
    /// 1. Check ~/.config/csm-cosmosdb/config.toml (Linux-style, preferred for consistency)
    /// 2. Fall back to ~/Library/Application Support/com.cosmotech.csm-cosmosdb/config.toml
    ///
    /// On Linux: ~/.config/csm-cosmosdb/config.toml
    /// On Windows: %APPDATA%\cosmotech\csm-cosmosdb\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("csm-cosmosdb")
                    .join("config.toml");

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs = ProjectDirs::from("com", "cosmotech", "csm-cosmosdb")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. Unset variables without a
    /// default are left as-is so that unused sections don't fail to load.
    ///
    /// Example:
    /// ```toml
    /// key = "${CSM_COSMOS_KEY}"
    /// uri = "${CSM_COSMOS_URI:-https://localhost:8081/}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
