//! Service base for Cosmos DB backed services
//!
//! Services embed a [`CosmosService`] and implement [`CosmosBacked`] to get
//! access to the shared client and the core database. The core database is
//! resolved once, when the base is constructed, and never again.
//!
//! ```rust
//! use std::sync::Arc;
//! use csm_cosmosdb_core::{
//!     CosmosBacked, CosmosClient, CosmosService, CoreError, PlatformProperties,
//! };
//!
//! struct WorkspaceService {
//!     cosmos: CosmosService<CosmosClient>,
//! }
//!
//! impl CosmosBacked for WorkspaceService {
//!     type Client = CosmosClient;
//!
//!     fn cosmos(&self) -> &CosmosService<CosmosClient> {
//!         &self.cosmos
//!     }
//! }
//!
//! fn build(client: Arc<CosmosClient>, properties: Arc<PlatformProperties>)
//!     -> Result<WorkspaceService, CoreError>
//! {
//!     let service = WorkspaceService { cosmos: CosmosService::new(client, properties)? };
//!     println!("core database: {}", service.core_database().id());
//!     Ok(service)
//! }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::config::PlatformProperties;
use crate::error::Result;
use crate::traits::DatabaseClient;

/// Shared state every Cosmos DB backed service starts from
pub struct CosmosService<C: DatabaseClient> {
    client: Arc<C>,
    properties: Arc<PlatformProperties>,
    core_database_name: String,
    core_database: C::Database,
}

impl<C: DatabaseClient> CosmosService<C> {
    /// Resolve the core database from the shared client.
    ///
    /// Fails with a missing-property error if
    /// `platform.azure.cosmos.core_database.name` is not set.
    pub fn new(client: Arc<C>, properties: Arc<PlatformProperties>) -> Result<Self> {
        let core_database_name = properties.core_database_name()?.to_string();
        let core_database = client.database(&core_database_name);
        debug!("Resolved core database '{}'", core_database_name);

        Ok(Self {
            client,
            properties,
            core_database_name,
            core_database,
        })
    }

    /// The core database handle resolved at construction
    pub fn core_database(&self) -> &C::Database {
        &self.core_database
    }

    pub fn core_database_name(&self) -> &str {
        &self.core_database_name
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn platform_properties(&self) -> &PlatformProperties {
        &self.properties
    }
}

impl<C> Clone for CosmosService<C>
where
    C: DatabaseClient,
    C::Database: Clone,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            properties: Arc::clone(&self.properties),
            core_database_name: self.core_database_name.clone(),
            core_database: self.core_database.clone(),
        }
    }
}

impl<C> std::fmt::Debug for CosmosService<C>
where
    C: DatabaseClient,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmosService")
            .field("core_database_name", &self.core_database_name)
            .finish_non_exhaustive()
    }
}

/// Implemented by services built on a [`CosmosService`]
pub trait CosmosBacked {
    type Client: DatabaseClient;

    fn cosmos(&self) -> &CosmosService<Self::Client>;

    fn core_database(&self) -> &<Self::Client as DatabaseClient>::Database {
        self.cosmos().core_database()
    }

    fn cosmos_client(&self) -> &Arc<Self::Client> {
        self.cosmos().client()
    }

    fn platform_properties(&self) -> &PlatformProperties {
        self.cosmos().platform_properties()
    }
}
