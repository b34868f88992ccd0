//! Minimal Cosmos DB (SQL API) client over the REST interface.
//!
//! Mirrors the three calls a lookup needs: open a client for an account,
//! resolve a container by database and container name, and point-read one
//! document by id and optional partition key.

pub mod auth;
pub mod client;
pub mod error;

pub use client::{ContainerRef, CosmosClient, DatabaseRef, ItemResponse};
pub use error::CosmosError;
