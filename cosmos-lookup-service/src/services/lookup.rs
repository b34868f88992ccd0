use crate::config::CosmosSettings;
use crate::dtos::LookupRequest;
use crate::services::cosmos::{CosmosClient, CosmosError};
use crate::services::metrics::record_read;
use serde_json::Value;
use std::time::Instant;

/// Open a client for the caller's account and point-read the requested document.
///
/// The client lives only for this call. Every failure, including a missing
/// document, comes back as a [`CosmosError`].
pub async fn read_document(
    settings: &CosmosSettings,
    request: &LookupRequest,
) -> Result<Value, CosmosError> {
    let options = &request.options;

    let client = CosmosClient::new(&request.endpoint, &request.key, settings)?;
    let container = client
        .database(&options.database)
        .container(&options.container);

    let start = Instant::now();
    let result = container
        .read_item(&options.document_id, options.partition_key.as_ref())
        .await;
    record_read(
        start.elapsed(),
        result.as_ref().ok().and_then(|item| item.request_charge),
    );

    let item = result?;
    tracing::info!(
        database = %options.database,
        container = %options.container,
        document_id = %options.document_id,
        request_charge = ?item.request_charge,
        activity_id = ?item.activity_id,
        "Document read"
    );

    Ok(item.resource)
}
