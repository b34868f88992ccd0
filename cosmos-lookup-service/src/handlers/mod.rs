pub mod health;
pub mod lookup;

pub use health::{health_check, metrics};
pub use lookup::get_cosmos_doc;
