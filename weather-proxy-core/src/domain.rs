pub mod config;
pub mod ids;
pub mod snapshot;

pub use config::*;
pub use ids::*;
pub use snapshot::*;
