//! Master-key request signing for the Cosmos DB REST API.
//!
//! The signature is computed as:
//! `base64(HMAC-SHA256(verb\nresourceType\nresourceLink\ndate\n\n, key))`
//! with verb, resource type and date lower-cased, and the result wrapped in a
//! URL-encoded `type=master&ver=1.0&sig=...` token.

use super::CosmosError;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretVec};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Decoded account master key.
pub struct MasterKey(SecretVec<u8>);

impl MasterKey {
    /// Decode the base64 key as shown in the Azure portal.
    pub fn from_base64(key: &str) -> Result<Self, CosmosError> {
        let bytes = general_purpose::STANDARD
            .decode(key.trim())
            .map_err(|e| CosmosError::InvalidKey(e.to_string()))?;

        if bytes.is_empty() {
            return Err(CosmosError::InvalidKey("key is empty".to_string()));
        }

        Ok(Self(SecretVec::new(bytes)))
    }

    /// Build the `authorization` header value for one request.
    pub fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> Result<String, CosmosError> {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        );

        let mut mac = HmacSha256::new_from_slice(self.0.expose_secret())
            .map_err(|e| CosmosError::InvalidKey(e.to_string()))?;
        mac.update(payload.as_bytes());
        let signature = general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        let token = format!("type=master&ver=1.0&sig={}", signature);
        Ok(urlencoding::encode(&token).into_owned())
    }
}

/// RFC 1123 timestamp expected in `x-ms-date`.
pub fn format_request_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
