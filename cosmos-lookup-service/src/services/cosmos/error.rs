use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error type for Cosmos DB client operations.
#[derive(Debug, Error)]
pub enum CosmosError {
    #[error("Invalid endpoint URL '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Invalid master key: {0}")]
    InvalidKey(String),

    /// Non-success status returned by the account. Displays the service's own
    /// message.
    #[error("{message}")]
    Service {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("Request to Cosmos DB failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response from Cosmos DB: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl CosmosError {
    /// Build a `Service` error from a non-success response body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: Option<ServiceErrorBody> = serde_json::from_str(body).ok();
        let (code, message) = match parsed {
            Some(ServiceErrorBody { code, message }) => (code, message),
            None => (None, None),
        };

        let code = code.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown")
                .replace(' ', "")
        });
        let message = message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| format!("Cosmos DB returned status {}", status));

        CosmosError::Service {
            status,
            code,
            message,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CosmosError::Service { status, .. } => Some(*status),
            CosmosError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
