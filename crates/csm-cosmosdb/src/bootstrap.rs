//! Composition root
//!
//! Loads the effective configuration once and wires the Cosmos DB module
//! from it. Every command that needs the client goes through [`AppContext`].

use std::path::{Path, PathBuf};

use csm_cosmosdb_core::{Config, CosmosClient, CosmosModule, bootstrap_cosmos};
use tracing::debug;

use crate::error::Result;

pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load the effective configuration. An explicit `--config-file` is
    /// used as-is and disables environment overrides.
    pub fn load(config_file: Option<&str>) -> Result<Self> {
        let explicit = config_file.map(PathBuf::from);
        match &explicit {
            Some(path) => debug!("Loading config from explicit path: {:?}", path),
            None => debug!("Loading config from default location"),
        }

        let config = Config::load_effective(explicit.as_deref())?;
        Ok(Self { config })
    }

    /// Wire the Cosmos DB module.
    ///
    /// `None` means the module is switched off. Nothing touches the Azure
    /// settings in that case.
    pub fn cosmos_module(&self) -> Result<Option<CosmosModule<CosmosClient>>> {
        let module = if self.config.platform.is_enabled() {
            bootstrap_cosmos(&self.config)?
        } else {
            debug!("Cosmos DB module disabled by configuration");
            None
        };
        Ok(module)
    }
}

/// Location of the config file, without reading it
pub fn config_location(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::config_path()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use csm_cosmosdb_core::config::{AzureProperties, CosmosProperties};

    fn context(config: Config) -> AppContext {
        AppContext { config }
    }

    #[test]
    fn test_disabled_module_needs_no_azure_settings() {
        let ctx = context(Config::default());
        assert!(ctx.cosmos_module().unwrap().is_none());
    }

    #[test]
    fn test_enabled_module_without_name_is_missing_property() {
        let mut config = Config::default();
        config.platform.cosmosdb.enable = true;
        config.platform.azure = Some(AzureProperties {
            cosmos: Some(CosmosProperties::new(
                "https://acct.documents.azure.com:443/",
                "a2V5",
            )),
        });

        let err = context(config).cosmos_module().err().unwrap();
        assert!(matches!(
            err,
            CliError::MissingProperty { ref key } if key == "platform.azure.cosmos.core_database.name"
        ));
    }

    #[test]
    fn test_explicit_path_is_used_without_reading_it() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[[[broken").unwrap();

        assert_eq!(config_location(Some(&path)).unwrap(), path);
        assert!(AppContext::load(path.to_str()).is_err());
    }
}
