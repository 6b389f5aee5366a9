// Service exports
pub mod backend;
pub mod memory;
pub mod postgres;

pub use backend::{BackendClient, BackendCollections, BackendError};
pub use memory::{ChatMessage, MemoryStore};
pub use postgres::{PostgresError, PostgresStore};
