//! Seams between the wiring layer and the database SDK
//!
//! The factory and service base only need three capabilities: build a client
//! from some builder, resolve a database handle by name, and optionally probe
//! that handle. [`crate::client`] implements all three for Cosmos DB; tests
//! substitute counting fakes.

use async_trait::async_trait;

use crate::error::Result;

/// Something that can produce a client handle
pub trait ClientBuilder {
    type Client: DatabaseClient;
    type Error;

    fn build_client(&self) -> std::result::Result<Self::Client, Self::Error>;
}

/// A client handle that hands out logical database handles by name.
///
/// Resolution is expected to be cheap and infallible; any I/O happens when
/// the handle is used.
pub trait DatabaseClient: Send + Sync + 'static {
    type Database: Send + Sync;

    fn database(&self, name: &str) -> Self::Database;
}

/// A database handle that can verify it is reachable
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Logical database name
    fn id(&self) -> &str;

    /// Round-trip to the service to confirm the database exists
    async fn probe(&self) -> Result<()>;
}
