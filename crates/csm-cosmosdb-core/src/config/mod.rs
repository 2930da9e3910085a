//! Platform configuration for the Cosmos DB wiring layer
//!
//! Configuration is a TOML document with two concerns:
//!
//! - `platform.cosmosdb.enable`: the feature flag gating client construction
//! - `platform.azure.cosmos`: endpoint, master key and the core database name
//!
//! Values may reference environment variables (`${VAR}` / `${VAR:-default}`),
//! and a handful of `CSM_PLATFORM_*` variables override the file unless an
//! explicit config path was given.

// Nested config module is intentional for the config subsystem
#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;

pub use config::{
    AzureProperties, CONFIG_TEMPLATE, CORE_DATABASE_NAME_KEY, Config, ConsistencyLevel,
    CoreDatabase, CosmosDbToggle, CosmosProperties, PlatformProperties,
};
pub use credential::{is_keyring_reference, resolve_credential};
pub use error::{ConfigError, Result};
