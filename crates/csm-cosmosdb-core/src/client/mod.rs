//! Minimal Cosmos DB REST client
//!
//! Covers what the wiring layer needs and nothing more: a builder, a
//! shareable client handle, and database handles that can read their own
//! properties. Document, container and query operations are out of scope.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), csm_cosmosdb_core::CosmosError> {
//! use csm_cosmosdb_core::CosmosClient;
//!
//! let client = CosmosClient::builder()
//!     .endpoint("https://account.documents.azure.com:443/")
//!     .key("c2VjcmV0")
//!     .build()?;
//!
//! let database = client.database("phoenix-core");
//! let properties = database.read().await?;
//! println!("{}", properties.id);
//! # Ok(())
//! # }
//! ```

mod auth;
pub mod error;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::config::{ConfigError, ConsistencyLevel, CosmosProperties};
use crate::traits::{ClientBuilder, DatabaseClient, DatabaseProbe};

use auth::{MasterKey, rfc1123_date};
pub use error::CosmosError;

/// REST API version sent with every request
pub const API_VERSION: &str = "2018-12-31";

/// Default user agent for requests
pub const DEFAULT_USER_AGENT: &str = concat!("csm-cosmosdb/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`CosmosClient`]
#[derive(Clone, Default)]
pub struct CosmosClientBuilder {
    endpoint: Option<String>,
    key: Option<String>,
    consistency_level: ConsistencyLevel,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for CosmosClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmosClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("key", &self.key.as_ref().map(|_| "****"))
            .field("consistency_level", &self.consistency_level)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CosmosClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from platform properties, resolving the master key.
    ///
    /// A blank `uri` or `key` is reported as a missing property here, not at
    /// config load, so a disabled module never needs them.
    pub fn from_properties(properties: &CosmosProperties) -> Result<Self, ConfigError> {
        let endpoint = properties.endpoint()?;
        let key = properties.resolve_key()?;
        let timeout = properties.request_timeout()?;
        let user_agent = match &properties.user_agent_suffix {
            Some(suffix) if !suffix.trim().is_empty() => {
                format!("{} {}", DEFAULT_USER_AGENT, suffix.trim())
            }
            _ => DEFAULT_USER_AGENT.to_string(),
        };

        Ok(Self::new()
            .endpoint(endpoint)
            .key(key)
            .consistency_level(properties.consistency_level)
            .user_agent(user_agent)
            .timeout(timeout))
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Base64 account master key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = level;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate settings and build the client. Fails fast on bad endpoint or key.
    pub fn build(&self) -> Result<CosmosClient, CosmosError> {
        let raw_endpoint = self
            .endpoint
            .as_deref()
            .ok_or(CosmosError::MissingSetting("endpoint"))?;
        let endpoint = parse_endpoint(raw_endpoint)?;

        let key = self
            .key
            .as_deref()
            .ok_or(CosmosError::MissingSetting("key"))?;
        let key = MasterKey::from_base64(key)?;

        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(user_agent.as_str())
            .build()?;

        debug!(
            "Cosmos DB client built for {} (consistency: {})",
            endpoint, self.consistency_level
        );

        Ok(CosmosClient {
            inner: Arc::new(ClientInner {
                http,
                endpoint,
                key,
                consistency_level: self.consistency_level,
                user_agent,
            }),
        })
    }
}

impl ClientBuilder for CosmosClientBuilder {
    type Client = CosmosClient;
    type Error = CosmosError;

    fn build_client(&self) -> Result<CosmosClient, CosmosError> {
        self.build()
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, CosmosError> {
    let invalid = |reason: String| CosmosError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    // Resource links are joined onto the endpoint, which needs a trailing slash
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Shared client handle. Cloning is cheap and all clones share one HTTP pool.
#[derive(Clone)]
pub struct CosmosClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    endpoint: Url,
    key: MasterKey,
    consistency_level: ConsistencyLevel,
    user_agent: String,
}

impl std::fmt::Debug for CosmosClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmosClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("consistency_level", &self.inner.consistency_level)
            .finish_non_exhaustive()
    }
}

impl CosmosClient {
    pub fn builder() -> CosmosClientBuilder {
        CosmosClientBuilder::new()
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub fn consistency_level(&self) -> ConsistencyLevel {
        self.inner.consistency_level
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.user_agent
    }

    /// Handle to a logical database. No request is made.
    pub fn database(&self, id: impl Into<String>) -> CosmosDatabase {
        CosmosDatabase {
            client: self.clone(),
            id: id.into(),
        }
    }

    /// Signed GET of a single resource
    async fn get_resource<T: DeserializeOwned>(
        &self,
        resource_type: &str,
        resource_link: &str,
    ) -> Result<T, CosmosError> {
        let url = self
            .inner
            .endpoint
            .join(&encode_link(resource_link))
            .map_err(|e| CosmosError::InvalidEndpoint {
                endpoint: self.inner.endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let date = rfc1123_date(Utc::now());
        let authorization = self
            .inner
            .key
            .authorization("GET", resource_type, resource_link, &date)?;

        trace!("GET {}", url);
        let response = self
            .inner
            .http
            .get(url)
            .header(AUTHORIZATION, authorization)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .header("x-ms-consistency-level", self.inner.consistency_level.as_header())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("GET {} failed with HTTP {}", resource_link, status.as_u16());
        Err(CosmosError::from_status(status.as_u16(), &body))
    }
}

impl DatabaseClient for CosmosClient {
    type Database = CosmosDatabase;

    fn database(&self, name: &str) -> CosmosDatabase {
        CosmosClient::database(self, name)
    }
}

/// Percent-encode each segment of a resource link for use in a URL path
fn encode_link(resource_link: &str) -> String {
    resource_link
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Handle to a logical database within an account
#[derive(Clone, Debug)]
pub struct CosmosDatabase {
    client: CosmosClient,
    id: String,
}

/// System properties of a database resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseProperties {
    pub id: String,
    #[serde(rename = "_rid", default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    #[serde(rename = "_etag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(rename = "_ts", default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl CosmosDatabase {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client(&self) -> &CosmosClient {
        &self.client
    }

    /// Resource link, e.g. `dbs/phoenix-core`
    pub fn link(&self) -> String {
        format!("dbs/{}", self.id)
    }

    /// Read the database resource
    pub async fn read(&self) -> Result<DatabaseProperties, CosmosError> {
        self.client.get_resource("dbs", &self.link()).await
    }
}

#[async_trait]
impl DatabaseProbe for CosmosDatabase {
    fn id(&self) -> &str {
        &self.id
    }

    async fn probe(&self) -> crate::error::Result<()> {
        let properties = self.read().await?;
        if properties.id != self.id {
            return Err(crate::error::CoreError::Probe(format!(
                "expected database '{}' but service returned '{}'",
                self.id, properties.id
            )));
        }
        Ok(())
    }
}
