use crate::dtos::LookupRequest;
use crate::services::{read_document, record_lookup, LookupOutcome};
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

/// HTTP trigger: validate the lookup payload, then point-read the document.
///
/// Validation failures answer 400 before any connection is opened. Read
/// failures answer 500 with the client's message; the document itself is
/// returned as the 200 body.
pub async fn get_cosmos_doc(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request = LookupRequest::from_body(&body).map_err(|e| {
        record_lookup(LookupOutcome::Invalid);
        tracing::warn!(reason = %e, "Rejected lookup request");
        AppError::BadRequest(e.to_string())
    })?;

    let options = &request.options;
    tracing::info!(
        database = %options.database,
        container = %options.container,
        document_id = %options.document_id,
        has_partition_key = options.partition_key.is_some(),
        "Document lookup started"
    );

    let document = read_document(&state.config.cosmos, &request)
        .await
        .map_err(|e| {
            record_lookup(LookupOutcome::Error);
            tracing::error!(
                error = %e,
                status = ?e.status(),
                database = %options.database,
                container = %options.container,
                document_id = %options.document_id,
                "Document lookup failed"
            );
            AppError::InternalError(anyhow::Error::new(e))
        })?;

    record_lookup(LookupOutcome::Ok);
    Ok((StatusCode::OK, Json(document)))
}
