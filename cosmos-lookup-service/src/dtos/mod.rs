pub mod lookup;

pub use lookup::{LookupOptions, LookupRequest, PartitionKey, RequestError, REQUIRED_OPTIONS};
