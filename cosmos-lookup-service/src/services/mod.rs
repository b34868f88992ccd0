pub mod cosmos;
pub mod lookup;
pub mod metrics;

pub use cosmos::{CosmosClient, CosmosError};
pub use lookup::read_document;
pub use metrics::{get_metrics, init_metrics, record_lookup, LookupOutcome};
