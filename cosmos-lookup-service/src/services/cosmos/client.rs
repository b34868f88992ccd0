use super::auth::{format_request_date, MasterKey};
use super::CosmosError;
use crate::config::CosmosSettings;
use crate::dtos::PartitionKey;
use chrono::Utc;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

pub const DATE_HEADER: &str = "x-ms-date";
pub const VERSION_HEADER: &str = "x-ms-version";
pub const PARTITION_KEY_HEADER: &str = "x-ms-documentdb-partitionkey";
pub const REQUEST_CHARGE_HEADER: &str = "x-ms-request-charge";
pub const ACTIVITY_ID_HEADER: &str = "x-ms-activity-id";

/// Connection to one Cosmos DB account.
///
/// Built from caller-supplied credentials for a single lookup and dropped
/// afterwards; the underlying HTTP client is not shared between lookups.
pub struct CosmosClient {
    http: Client,
    endpoint: Url,
    key: MasterKey,
    api_version: String,
}

/// Named database on an account. Resolving it performs no I/O.
pub struct DatabaseRef<'a> {
    client: &'a CosmosClient,
    id: String,
}

/// Named container within a database. Resolving it performs no I/O.
pub struct ContainerRef<'a> {
    client: &'a CosmosClient,
    database: String,
    id: String,
}

/// Successful point-read.
#[derive(Debug, Clone)]
pub struct ItemResponse {
    pub resource: Value,
    pub request_charge: Option<f64>,
    pub activity_id: Option<String>,
}

impl CosmosClient {
    pub fn new(
        endpoint: &str,
        key: &SecretString,
        settings: &CosmosSettings,
    ) -> Result<Self, CosmosError> {
        let endpoint = parse_endpoint(endpoint)?;
        let key = MasterKey::from_base64(key.expose_secret())?;

        let http = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            http,
            endpoint,
            key,
            api_version: settings.api_version.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn database(&self, id: &str) -> DatabaseRef<'_> {
        DatabaseRef {
            client: self,
            id: id.to_string(),
        }
    }

    fn resource_url(&self, segments: &[&str]) -> Result<Url, CosmosError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| CosmosError::InvalidEndpoint {
                endpoint: self.endpoint.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl<'a> DatabaseRef<'a> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn container(&self, id: &str) -> ContainerRef<'a> {
        ContainerRef {
            client: self.client,
            database: self.id.clone(),
            id: id.to_string(),
        }
    }
}

impl ContainerRef<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Resource link used when signing requests, e.g. `dbs/db/colls/items`.
    pub fn link(&self) -> String {
        format!("dbs/{}/colls/{}", self.database, self.id)
    }

    /// Read one document by id.
    ///
    /// Without a partition key the header is omitted and the account applies
    /// its default for the container. Any non-success status, 404 included,
    /// is returned as [`CosmosError::Service`].
    pub async fn read_item(
        &self,
        id: &str,
        partition_key: Option<&PartitionKey>,
    ) -> Result<ItemResponse, CosmosError> {
        let client = self.client;
        let resource_link = format!("{}/docs/{}", self.link(), id);
        let url = client.resource_url(&["dbs", &self.database, "colls", &self.id, "docs", id])?;

        let date = format_request_date(Utc::now());
        let authorization = client.key.authorization("get", "docs", &resource_link, &date)?;

        let mut request = client
            .http
            .get(url)
            .header(AUTHORIZATION, authorization)
            .header(DATE_HEADER, &date)
            .header(VERSION_HEADER, &client.api_version)
            .header(ACCEPT, "application/json");

        if let Some(partition_key) = partition_key {
            request = request.header(PARTITION_KEY_HEADER, partition_key.to_header_value());
        }

        let response = request.send().await?;

        let status = response.status();
        let request_charge = header_str(&response, REQUEST_CHARGE_HEADER)
            .and_then(|v| v.parse::<f64>().ok());
        let activity_id = header_str(&response, ACTIVITY_ID_HEADER).map(str::to_string);
        let body = response.text().await?;

        tracing::debug!(
            status = %status,
            resource_link = %resource_link,
            request_charge = ?request_charge,
            activity_id = ?activity_id,
            "Cosmos DB read_item response"
        );

        if !status.is_success() {
            return Err(CosmosError::from_response(status, &body));
        }

        let resource = serde_json::from_str(&body)
            .map_err(|e| CosmosError::MalformedResponse(e.to_string()))?;

        Ok(ItemResponse {
            resource,
            request_charge,
            activity_id,
        })
    }
}

fn header_str<'r>(response: &'r reqwest::Response, name: &str) -> Option<&'r str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

fn parse_endpoint(endpoint: &str) -> Result<Url, CosmosError> {
    let invalid = |reason: String| CosmosError::InvalidEndpoint {
        endpoint: redact_endpoint(endpoint),
        reason,
    };

    let mut url = Url::parse(endpoint.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() || url.cannot_be_a_base() {
        return Err(invalid("missing host".to_string()));
    }

    // Requests are signed with the master key; userinfo is never sent.
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Endpoint text safe for logs and error bodies: any `user:password@` part is dropped.
fn redact_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if let Ok(mut url) = Url::parse(endpoint) {
        if !url.cannot_be_a_base() {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            return url.to_string();
        }
    }

    match endpoint.rfind('@') {
        Some(at) => match endpoint.find("://") {
            Some(sep) if sep < at => format!("{}{}", &endpoint[..sep + 3], &endpoint[at + 1..]),
            _ => endpoint[at + 1..].to_string(),
        },
        None => endpoint.to_string(),
    }
}
