//! Lookup request payload and its validation.
//!
//! The payload is inspected as raw JSON rather than through a derived
//! `Deserialize` so that each kind of malformed field maps to its own 400
//! message, checked in a fixed order. Validation stops at the first failure
//! and no database call is attempted for an invalid request.

use secrecy::SecretString;
use serde_json::{Map, Value};
use thiserror::Error;

/// Required `options` fields, in the order they are checked.
pub const REQUIRED_OPTIONS: [&str; 3] = ["database", "container", "documentId"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing request body")]
    MissingBody,

    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("Missing required parameters endpoint and/or key")]
    MissingCredentials,

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter {0} must be a string")]
    NotAString(&'static str),

    #[error("Parameter {0} cannot be empty")]
    EmptyParameter(&'static str),
}

/// Partition key value, forwarded to Cosmos DB exactly as the caller sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionKey(Value);

impl PartitionKey {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Encoding used by the `x-ms-documentdb-partitionkey` header: a JSON
    /// array holding the key value, or the array itself for hierarchical
    /// keys. Header values must be ASCII, so other characters are written
    /// as `\uXXXX` escapes.
    pub fn to_header_value(&self) -> String {
        let json = match &self.0 {
            Value::Array(_) => self.0.to_string(),
            other => Value::Array(vec![other.clone()]).to_string(),
        };
        let mut encoded = String::with_capacity(json.len());
        for c in json.chars() {
            if c.is_ascii() {
                encoded.push(c);
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    encoded.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
        encoded
    }
}

#[derive(Debug, Clone)]
pub struct LookupOptions {
    pub database: String,
    pub container: String,
    pub document_id: String,
    pub partition_key: Option<PartitionKey>,
}

/// A validated lookup: account credentials plus the document coordinates.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub endpoint: String,
    pub key: SecretString,
    pub options: LookupOptions,
}

impl LookupRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, RequestError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(RequestError::MissingBody);
        }

        let payload: Value = serde_json::from_slice(body)
            .map_err(|e| RequestError::MalformedBody(e.to_string()))?;

        let fields = match payload {
            Value::Null => return Err(RequestError::MissingBody),
            Value::Object(fields) => fields,
            _ => return Err(RequestError::MissingCredentials),
        };

        if is_missing(fields.get("endpoint")) || is_missing(fields.get("key")) {
            return Err(RequestError::MissingCredentials);
        }
        let endpoint = required_string(&fields, "endpoint")?;
        let key = required_string(&fields, "key")?;

        let empty = Map::new();
        let options = match fields.get("options") {
            Some(Value::Object(options)) => options,
            _ => &empty,
        };

        let [database, container, document_id] = REQUIRED_OPTIONS;
        let options = LookupOptions {
            database: required_string(options, database)?,
            container: required_string(options, container)?,
            document_id: required_string(options, document_id)?,
            partition_key: options.get("partitionKey").cloned().map(PartitionKey::new),
        };

        Ok(Self {
            endpoint,
            key: SecretString::new(key),
            options,
        })
    }
}

/// JSON rendering of a JavaScript falsy value, or no value at all.
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn required_string(fields: &Map<String, Value>, field: &'static str) -> Result<String, RequestError> {
    match fields.get(field) {
        Some(Value::String(s)) if s.is_empty() => Err(RequestError::EmptyParameter(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        value if is_missing(value) => Err(RequestError::MissingParameter(field)),
        Some(_) => Err(RequestError::NotAString(field)),
        None => Err(RequestError::MissingParameter(field)),
    }
}
