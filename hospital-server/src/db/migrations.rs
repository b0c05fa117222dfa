//! Schema migrations for the paciente and atencion tables
//!
//! Idempotent: every statement uses IF NOT EXISTS, so this runs on each
//! startup.

use sqlx::PgPool;

/// Statements applied in order.
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS paciente (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        apellido TEXT NOT NULL,
        run VARCHAR(13) NOT NULL UNIQUE,
        direccion TEXT NOT NULL,
        fecha_nacimiento TEXT NOT NULL,
        correo TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS atencion (
        id BIGSERIAL PRIMARY KEY,
        fecha_atencion TEXT NOT NULL,
        hora_atencion TEXT NOT NULL,
        costo DOUBLE PRECISION NOT NULL,
        comentario TEXT,
        id_paciente BIGINT NOT NULL REFERENCES paciente(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_atencion_id_paciente ON atencion(id_paciente)",
    "CREATE INDEX IF NOT EXISTS idx_paciente_nombre ON paciente(nombre)",
];

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    for &statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!(count = STATEMENTS.len(), "Migrations complete");
    Ok(())
}
