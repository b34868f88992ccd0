#![allow(dead_code)]

use cosmos_lookup_service::config::{CosmosSettings, FunctionConfig, LookupConfig};
use cosmos_lookup_service::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// base64("cosmos-lookup-test-master-key")
pub const TEST_KEY: &str = "Y29zbW9zLWxvb2t1cC10ZXN0LW1hc3Rlci1rZXk=";
pub const TEST_DATABASE: &str = "inventory";
pub const TEST_CONTAINER: &str = "products";
pub const FUNCTION_NAME: &str = "getCosmosDoc";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = LookupConfig {
            common: CoreConfig {
                port: 0, // Random port for testing
                ..CoreConfig::default()
            },
            function: FunctionConfig {
                name: FUNCTION_NAME.to_string(),
            },
            cosmos: CosmosSettings {
                request_timeout: Duration::from_secs(5),
                ..CosmosSettings::default()
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn function_url(&self) -> String {
        format!("{}/api/{}", self.address, FUNCTION_NAME)
    }

    /// POST a JSON lookup payload to the function route.
    pub async fn lookup(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.function_url())
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// POST raw bytes to the function route.
    pub async fn lookup_raw(&self, body: &'static str) -> reqwest::Response {
        self.client
            .post(self.function_url())
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Build a lookup payload against the given account endpoint.
pub fn lookup_body(endpoint: &str, document_id: &str, partition_key: Option<&str>) -> Value {
    let mut options = json!({
        "database": TEST_DATABASE,
        "container": TEST_CONTAINER,
        "documentId": document_id,
    });
    if let Some(pk) = partition_key {
        options["partitionKey"] = json!(pk);
    }

    json!({
        "endpoint": endpoint,
        "key": TEST_KEY,
        "options": options,
    })
}

pub fn document_path(document_id: &str) -> String {
    format!(
        "/dbs/{}/colls/{}/docs/{}",
        TEST_DATABASE, TEST_CONTAINER, document_id
    )
}

/// Serve `document` for a signed point-read of `document_id`.
pub async fn mount_document(server: &MockServer, document_id: &str, document: &Value) {
    Mock::given(method("GET"))
        .and(path(document_path(document_id)))
        .and(header_exists("authorization"))
        .and(header_exists("x-ms-date"))
        .and(header("x-ms-version", "2018-12-31"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ms-request-charge", "1.05")
                .insert_header("x-ms-activity-id", "a7b1c7e2-0000-0000-0000-000000000000")
                .set_body_json(document),
        )
        .mount(server)
        .await;
}

/// Answer a point-read of `document_id` the way Cosmos DB does for a missing item.
pub async fn mount_not_found(server: &MockServer, document_id: &str) {
    Mock::given(method("GET"))
        .and(path(document_path(document_id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NotFound",
            "message": "Entity with the specified id does not exist in the system."
        })))
        .mount(server)
        .await;
}

pub async fn assert_no_cosmos_calls(server: &MockServer) {
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(
        requests.is_empty(),
        "expected no Cosmos DB calls, got {}",
        requests.len()
    );
}
