//! End-to-end wiring against a mocked Cosmos DB gateway

use std::sync::Arc;

use csm_cosmosdb_core::{
    CosmosBacked, CosmosClient, CosmosService, HealthStatus, bootstrap_cosmos, check_database,
    config::{AzureProperties, Config, CosmosProperties},
};
use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "cGhvZW5peC10ZXN0LW1hc3Rlci1rZXk=";

fn enabled_config(uri: &str, core_database: Option<&str>) -> Config {
    let mut cosmos = CosmosProperties::new(uri, TEST_KEY);
    cosmos.core_database.name = core_database.map(str::to_string);

    let mut config = Config::default();
    config.platform.cosmosdb.enable = true;
    config.platform.azure = Some(AzureProperties {
        cosmos: Some(cosmos),
    });
    config
}

struct OrganizationService {
    cosmos: CosmosService<CosmosClient>,
}

impl CosmosBacked for OrganizationService {
    type Client = CosmosClient;

    fn cosmos(&self) -> &CosmosService<CosmosClient> {
        &self.cosmos
    }
}

#[tokio::test]
async fn test_core_database_read_is_signed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dbs/phoenix-core"))
        .and(header_exists("authorization"))
        .and(header_exists("x-ms-date"))
        .and(header("x-ms-version", "2018-12-31"))
        .and(header("x-ms-consistency-level", "Session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "phoenix-core",
            "_rid": "abc==",
            "_etag": "\"0000\"",
            "_ts": 1700000000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let module = bootstrap_cosmos(&enabled_config(&server.uri(), Some("phoenix-core")))
        .unwrap()
        .expect("module should be enabled");
    let service = OrganizationService {
        cosmos: module.service().unwrap(),
    };

    let properties = service.core_database().read().await.unwrap();
    assert_eq!(properties.id, "phoenix-core");
    assert_eq!(properties.rid.as_deref(), Some("abc=="));
    assert_eq!(properties.ts, Some(1700000000));
}

#[tokio::test]
async fn test_health_check_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dbs/phoenix-core"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "phoenix-core" })))
        .mount(&server)
        .await;

    let module = bootstrap_cosmos(&enabled_config(&server.uri(), Some("phoenix-core")))
        .unwrap()
        .unwrap();
    let service = module.service().unwrap();

    let report = check_database(service.core_database()).await;
    assert_eq!(report.status, HealthStatus::Up);
    assert_eq!(report.database.as_deref(), Some("phoenix-core"));
}

#[tokio::test]
async fn test_missing_database_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dbs/phoenix-core"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NotFound",
            "message": "Resource Not Found"
        })))
        .mount(&server)
        .await;

    let module = bootstrap_cosmos(&enabled_config(&server.uri(), Some("phoenix-core")))
        .unwrap()
        .unwrap();
    let service = module.service().unwrap();

    let err = service.core_database().read().await.unwrap_err();
    assert!(err.is_not_found());

    let report = check_database(service.core_database()).await;
    assert_eq!(report.status, HealthStatus::Down);
    assert!(report.detail.unwrap().contains("Resource Not Found"));
}

#[tokio::test]
async fn test_bad_key_maps_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dbs/phoenix-core"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "Unauthorized",
            "message": "The input authorization token can't serve the request."
        })))
        .mount(&server)
        .await;

    let module = bootstrap_cosmos(&enabled_config(&server.uri(), Some("phoenix-core")))
        .unwrap()
        .unwrap();
    let service = module.service().unwrap();

    let err = service.core_database().read().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_disabled_flag_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = enabled_config(&server.uri(), Some("phoenix-core"));
    config.platform.cosmosdb.enable = false;

    assert!(bootstrap_cosmos(&config).unwrap().is_none());
}

#[test]
fn test_missing_core_database_fails_bootstrap() {
    let config = enabled_config("https://acct.documents.azure.com:443/", None);

    let err = bootstrap_cosmos(&config).err().expect("bootstrap should fail");
    assert!(err.is_missing_config());
    assert_eq!(
        err.missing_key(),
        Some("platform.azure.cosmos.core_database.name")
    );
}

#[test]
fn test_enabled_without_uri_fails_bootstrap() {
    let config = Config::from_toml(
        r#"
[platform.cosmosdb]
enable = true

[platform.azure.cosmos]
key = "cGhvZW5peC10ZXN0LW1hc3Rlci1rZXk="

[platform.azure.cosmos.core_database]
name = "phoenix-core"
"#,
    )
    .unwrap();

    let err = bootstrap_cosmos(&config).err().expect("bootstrap should fail");
    assert!(err.is_missing_config());
    assert_eq!(err.missing_key(), Some("platform.azure.cosmos.uri"));
}

#[test]
fn test_disabled_without_uri_skips_wiring() {
    let config = Config::from_toml(
        r#"
[platform.cosmosdb]
enable = false

[platform.azure.cosmos.core_database]
name = "phoenix-core"
"#,
    )
    .unwrap();

    assert!(bootstrap_cosmos(&config).unwrap().is_none());
}

#[test]
fn test_invalid_endpoint_fails_bootstrap() {
    let config = enabled_config("ftp://acct.documents.azure.com", Some("phoenix-core"));

    let err = bootstrap_cosmos(&config).err().expect("bootstrap should fail");
    assert!(err.to_string().contains("Invalid endpoint"));
}

#[test]
fn test_services_share_one_client() {
    let config = enabled_config("https://acct.documents.azure.com:443/", Some("phoenix-core"));
    let module = bootstrap_cosmos(&config).unwrap().unwrap();

    let organizations = OrganizationService {
        cosmos: module.service().unwrap(),
    };
    let workspaces = OrganizationService {
        cosmos: module.service().unwrap(),
    };

    assert!(Arc::ptr_eq(
        organizations.cosmos_client(),
        workspaces.cosmos_client()
    ));
    assert!(std::ptr::eq(
        organizations.core_database(),
        organizations.core_database()
    ));
}
