//! # csm-cosmosdb-core
//!
//! Conditional Cosmos DB wiring for the Cosmo Tech platform API.
//!
//! The crate does two things:
//!
//! 1. **Client factory**: when `platform.cosmosdb.enable` is true, build one
//!    Cosmos DB client and share it (see [`factory`]). When false, nothing is
//!    built and nothing that depends on the client can be constructed.
//! 2. **Service base**: [`CosmosService`] resolves the configured core
//!    database from the shared client once and keeps the handle for the
//!    services that embed it.
//!
//! There is no hidden registration. The binary's `main` is the composition
//! root and calls [`bootstrap_cosmos`] explicitly.
//!
//! ```rust,no_run
//! use csm_cosmosdb_core::{Config, bootstrap_cosmos};
//!
//! # fn run() -> Result<(), csm_cosmosdb_core::CoreError> {
//! let config = Config::load_effective(None)?;
//! if let Some(module) = bootstrap_cosmos(&config)? {
//!     let service = module.service()?;
//!     println!("core database: {}", service.core_database().id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod health;
pub mod service;
pub mod traits;

pub use client::{CosmosClient, CosmosClientBuilder, CosmosDatabase, CosmosError, DatabaseProperties};
pub use config::{
    AzureProperties, Config, ConfigError, ConsistencyLevel, CoreDatabase, CosmosDbToggle,
    CosmosProperties, PlatformProperties,
};
pub use error::{CoreError, Result};
pub use factory::{CosmosModule, bootstrap_cosmos, cosmos_client};
pub use health::{HealthReport, HealthStatus, check_database};
pub use service::{CosmosBacked, CosmosService};
pub use traits::{ClientBuilder, DatabaseClient, DatabaseProbe};
