//! hospital-server: REST API for patients (pacientes) and their visits (atenciones)
//!
//! Layers, outermost first:
//! - `http`: axum routes, extractors and error mapping
//! - `service`: RUN upsert guard, patch merge, patient resolution for visits
//! - `db`: store traits with PostgreSQL (sqlx) and in-memory implementations
//! - `models`: records and request payloads

pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use db::repos::DbError;
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
