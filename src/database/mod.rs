//! Postgres connection management.

pub mod pool;

pub use pool::{create_pool, DatabaseError};
