//! Database layer - connection pool, schema and repositories
//!
//! Handlers never touch sqlx directly; they go through the store traits in
//! `repos`, which have a PostgreSQL and an in-memory implementation.

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
