//! Conditional client construction
//!
//! The composition root decides, with a plain `if` on the feature flag,
//! whether a Cosmos DB client exists at all. When it does, exactly one client
//! is built and shared through an [`Arc`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::client::CosmosClientBuilder;
use crate::config::{Config, CosmosDbToggle, PlatformProperties};
use crate::error::{CoreError, Result};
use crate::service::CosmosService;
use crate::traits::{ClientBuilder, DatabaseClient};

/// Build the shared client if the flag is on.
///
/// The builder is not touched when the flag is off. Builder errors are
/// returned unchanged.
pub fn cosmos_client<B>(
    toggle: &CosmosDbToggle,
    builder: &B,
) -> std::result::Result<Option<Arc<B::Client>>, B::Error>
where
    B: ClientBuilder,
{
    if !toggle.enable {
        debug!("Cosmos DB module disabled, no client built");
        return Ok(None);
    }

    let client = builder.build_client()?;
    info!("Cosmos DB client created");
    Ok(Some(Arc::new(client)))
}

/// The live Cosmos DB module: one shared client plus the properties it was
/// built from.
pub struct CosmosModule<C> {
    client: Arc<C>,
    properties: Arc<PlatformProperties>,
}

impl<C> Clone for CosmosModule<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            properties: Arc::clone(&self.properties),
        }
    }
}

impl<C: DatabaseClient> CosmosModule<C> {
    /// Wire the module from configuration and a builder.
    ///
    /// Returns `Ok(None)` when the flag is off. When it is on, the core
    /// database name is checked before the builder runs, so a missing name
    /// fails startup without ever creating a client.
    pub fn bootstrap<B>(config: &Config, builder: &B) -> Result<Option<Self>>
    where
        B: ClientBuilder<Client = C>,
        B::Error: Into<CoreError>,
    {
        if !config.platform.is_enabled() {
            debug!("platform.cosmosdb.enable is false, skipping Cosmos DB wiring");
            return Ok(None);
        }

        let core_database = config.platform.core_database_name()?;
        debug!("Core database configured: {}", core_database);

        let Some(client) = cosmos_client(&config.platform.cosmosdb, builder)
            .map_err(Into::<CoreError>::into)?
        else {
            return Ok(None);
        };

        Ok(Some(Self::from_parts(client, config.platform.clone())))
    }

    /// Assemble a module around an existing client
    pub fn from_parts(client: Arc<C>, properties: PlatformProperties) -> Self {
        Self {
            client,
            properties: Arc::new(properties),
        }
    }

    /// The shared client. Every call returns the same instance.
    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    pub fn properties(&self) -> &PlatformProperties {
        &self.properties
    }

    /// Build a service base sharing this module's client
    pub fn service(&self) -> Result<CosmosService<C>> {
        CosmosService::new(self.client(), Arc::clone(&self.properties))
    }
}

/// Wire the module with a [`CosmosClientBuilder`] seeded from configuration.
///
/// This is what the binary calls from `main`. The flag is checked before the
/// `azure.cosmos` section is read, so a disabled module needs no Azure
/// settings at all.
pub fn bootstrap_cosmos(config: &Config) -> Result<Option<CosmosModule<crate::CosmosClient>>> {
    if !config.platform.is_enabled() {
        debug!("platform.cosmosdb.enable is false, skipping Cosmos DB wiring");
        return Ok(None);
    }

    config.platform.core_database_name()?;
    let builder = CosmosClientBuilder::from_properties(config.platform.cosmos()?)?;
    CosmosModule::bootstrap(config, &builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AzureProperties, CosmosProperties};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeClient;

    impl DatabaseClient for FakeClient {
        type Database = String;

        fn database(&self, name: &str) -> String {
            name.to_string()
        }
    }

    #[derive(Default)]
    struct CountingBuilder {
        builds: AtomicUsize,
        fail: bool,
    }

    impl ClientBuilder for CountingBuilder {
        type Client = FakeClient;
        type Error = CoreError;

        fn build_client(&self) -> Result<FakeClient> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CoreError::Probe("builder exploded".to_string()));
            }
            Ok(FakeClient)
        }
    }

    fn config(enable: bool, name: Option<&str>) -> Config {
        let mut cosmos = CosmosProperties::new("https://acct.documents.azure.com:443/", "a2V5");
        cosmos.core_database.name = name.map(str::to_string);

        let mut config = Config::default();
        config.platform.cosmosdb.enable = enable;
        config.platform.azure = Some(AzureProperties {
            cosmos: Some(cosmos),
        });
        config
    }

    #[test]
    fn test_disabled_flag_never_builds() {
        let builder = CountingBuilder::default();
        let client = cosmos_client(&CosmosDbToggle { enable: false }, &builder).unwrap();

        assert!(client.is_none());
        assert_eq!(builder.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_enabled_flag_builds_once() {
        let builder = CountingBuilder::default();
        let client = cosmos_client(&CosmosDbToggle { enable: true }, &builder).unwrap();

        assert!(client.is_some());
        assert_eq!(builder.builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builder_error_propagates_unchanged() {
        let builder = CountingBuilder {
            fail: true,
            ..Default::default()
        };
        let err = cosmos_client(&CosmosDbToggle { enable: true }, &builder).unwrap_err();
        assert_eq!(err.to_string(), "Probe failed: builder exploded");
    }

    #[test]
    fn test_bootstrap_disabled_returns_none() {
        let builder = CountingBuilder::default();
        let module = CosmosModule::bootstrap(&config(false, None), &builder).unwrap();

        assert!(module.is_none());
        assert_eq!(builder.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bootstrap_shares_one_client() {
        let builder = CountingBuilder::default();
        let module = CosmosModule::bootstrap(&config(true, Some("phoenix-core")), &builder)
            .unwrap()
            .unwrap();

        let first = module.client();
        let second = module.clone().client();
        let service = module.service().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, service.client()));
        assert_eq!(builder.builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bootstrap_missing_name_fails_before_building() {
        let builder = CountingBuilder::default();
        let result = CosmosModule::bootstrap(&config(true, None), &builder);

        let err = result.err().unwrap();
        assert!(err.is_missing_config());
        assert_eq!(
            err.missing_key(),
            Some(crate::config::CORE_DATABASE_NAME_KEY)
        );
        assert_eq!(builder.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_bootstrap_cosmos_disabled_needs_no_azure_section() {
        let module = bootstrap_cosmos(&Config::default()).unwrap();
        assert!(module.is_none());
    }

    #[test]
    fn test_bootstrap_cosmos_missing_section() {
        let mut config = Config::default();
        config.platform.cosmosdb.enable = true;

        let err = bootstrap_cosmos(&config).err().unwrap();
        assert!(err.is_missing_config());
    }

    #[test]
    fn test_bootstrap_cosmos_builds_real_client() {
        let module = bootstrap_cosmos(&config(true, Some("phoenix-core")))
            .unwrap()
            .unwrap();

        let service = module.service().unwrap();
        assert_eq!(service.core_database().id(), "phoenix-core");
        assert_eq!(
            module.client().endpoint().as_str(),
            "https://acct.documents.azure.com/"
        );
    }
}
