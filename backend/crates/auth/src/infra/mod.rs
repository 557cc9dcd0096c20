//! Infrastructure Layer
//!
//! Database and key-value store implementations.

pub mod memory;
pub mod postgres;
pub mod redis_store;

pub use memory::{InMemoryAccountDirectory, InMemorySessionStore};
pub use postgres::PgAccountDirectory;
pub use redis_store::RedisSessionStore;
