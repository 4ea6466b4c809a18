pub mod memory;
pub mod postgres;
pub mod repositories;

pub use memory::InMemorySnapshotStore;
pub use repositories::*;
