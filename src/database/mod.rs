//! Persistence layer for MentorCore
//!
//! Handles:
//! - The key-value store the app state lives in (SQLite or in-memory)
//! - The persisted key-naming scheme
//! - Typed JSON reads and writes over the store

pub mod models;
pub mod schema;
pub mod connection;
pub mod queries;
pub mod store;
pub mod keys;
pub mod gateway;

pub use connection::Database;
pub use gateway::PersistenceGateway;
pub use store::{KeyValueStore, MemoryStore};
pub use models::*;
