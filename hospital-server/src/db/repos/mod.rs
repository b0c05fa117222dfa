//! Storage traits and their implementations
//!
//! - `PgPacienteRepo` / `PgAtencionRepo`: PostgreSQL via sqlx
//! - `MemoryStore`: in-process tables for tests and `--in-memory` serving
//!
//! Both enforce the same constraints: NOT NULL columns, UNIQUE(run),
//! run length and the atencion -> paciente foreign key.

pub mod atenciones;
pub mod memory;
pub mod pacientes;

use async_trait::async_trait;

use crate::models::{Atencion, AtencionDraft, Paciente, PacienteDraft};

pub use atenciones::PgAtencionRepo;
pub use memory::MemoryStore;
pub use pacientes::PgPacienteRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("constraint violation ({constraint}): {message}")]
    Constraint {
        constraint: &'static str,
        message: String,
    },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// How a name search is executed.
///
/// Both variants match `nombre` exactly and return the same rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameQuery {
    /// Typed query mapped onto `Paciente` via `FromRow`
    Mapped,
    /// Raw `SELECT *` with columns extracted by hand
    Native,
}

/// Patient storage
#[async_trait]
pub trait PacienteStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Paciente>, DbError>;

    async fn get(&self, id: i64) -> Result<Option<Paciente>, DbError>;

    async fn find_by_run(&self, run: &str) -> Result<Option<Paciente>, DbError>;

    async fn find_by_correo(&self, correo: &str) -> Result<Option<Paciente>, DbError>;

    async fn find_by_nombre(&self, nombre: &str, query: NameQuery)
        -> Result<Vec<Paciente>, DbError>;

    async fn insert(&self, draft: &PacienteDraft) -> Result<Paciente, DbError>;

    /// Overwrite every column of row `id`. `None` when the row is absent.
    async fn update(&self, id: i64, draft: &PacienteDraft) -> Result<Option<Paciente>, DbError>;

    /// Returns false when there was nothing to delete.
    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}

/// Visit storage. Every returned visit carries its patient.
#[async_trait]
pub trait AtencionStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Atencion>, DbError>;

    async fn get(&self, id: i64) -> Result<Option<Atencion>, DbError>;

    async fn list_by_paciente(&self, paciente_id: i64) -> Result<Vec<Atencion>, DbError>;

    /// Insert a visit linked to `paciente_id`; the draft's own reference is ignored.
    async fn insert(&self, paciente_id: i64, draft: &AtencionDraft) -> Result<Atencion, DbError>;

    async fn update(
        &self,
        id: i64,
        paciente_id: i64,
        draft: &AtencionDraft,
    ) -> Result<Option<Atencion>, DbError>;

    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}
