//! Visit repository (PostgreSQL)
//!
//! Every read JOINs the owning patient so a visit is returned whole in a
//! single query. Writes use a CTE so the inserted/updated row comes back
//! already joined.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{AtencionStore, DbError};
use crate::models::{Atencion, AtencionDraft, Paciente};

/// Column list shared by every joined select; patient columns are prefixed.
const JOINED_COLUMNS: &str = r#"
    a.id,
    a.fecha_atencion,
    a.hora_atencion,
    a.costo,
    a.comentario,
    p.id AS paciente_id,
    p.nombre AS paciente_nombre,
    p.apellido AS paciente_apellido,
    p.run AS paciente_run,
    p.direccion AS paciente_direccion,
    p.fecha_nacimiento AS paciente_fecha_nacimiento,
    p.correo AS paciente_correo
"#;

/// Visit repository
#[derive(Clone)]
pub struct PgAtencionRepo {
    pool: PgPool,
}

impl PgAtencionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn atencion_from_row(row: &PgRow) -> Result<Atencion, sqlx::Error> {
    Ok(Atencion {
        id: row.try_get("id")?,
        fecha_atencion: row.try_get("fecha_atencion")?,
        hora_atencion: row.try_get("hora_atencion")?,
        costo: row.try_get("costo")?,
        comentario: row.try_get("comentario")?,
        paciente: Paciente {
            id: row.try_get("paciente_id")?,
            nombre: row.try_get("paciente_nombre")?,
            apellido: row.try_get("paciente_apellido")?,
            run: row.try_get("paciente_run")?,
            direccion: row.try_get("paciente_direccion")?,
            fecha_nacimiento: row.try_get("paciente_fecha_nacimiento")?,
            correo: row.try_get("paciente_correo")?,
        },
    })
}

fn collect_rows(rows: Vec<PgRow>) -> Result<Vec<Atencion>, DbError> {
    rows.iter()
        .map(atencion_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::from)
}

#[async_trait]
impl AtencionStore for PgAtencionRepo {
    async fn list(&self) -> Result<Vec<Atencion>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM atencion a
            JOIN paciente p ON p.id = a.id_paciente
            ORDER BY a.id
            "#,
            JOINED_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        collect_rows(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Atencion>, DbError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM atencion a
            JOIN paciente p ON p.id = a.id_paciente
            WHERE a.id = $1
            "#,
            JOINED_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(atencion_from_row).transpose()?)
    }

    async fn list_by_paciente(&self, paciente_id: i64) -> Result<Vec<Atencion>, DbError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM atencion a
            JOIN paciente p ON p.id = a.id_paciente
            WHERE a.id_paciente = $1
            ORDER BY a.id
            "#,
            JOINED_COLUMNS
        ))
        .bind(paciente_id)
        .fetch_all(&self.pool)
        .await?;

        collect_rows(rows)
    }

    async fn insert(&self, paciente_id: i64, draft: &AtencionDraft) -> Result<Atencion, DbError> {
        // Single query: CTE for insert + JOIN for the patient
        let row = sqlx::query(&format!(
            r#"
            WITH inserted AS (
                INSERT INTO atencion (fecha_atencion, hora_atencion, costo, comentario, id_paciente)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {}
            FROM inserted a
            JOIN paciente p ON p.id = a.id_paciente
            "#,
            JOINED_COLUMNS
        ))
        .bind(draft.fecha_atencion.as_deref())
        .bind(draft.hora_atencion.as_deref())
        .bind(draft.costo)
        .bind(draft.comentario.as_deref())
        .bind(paciente_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(atencion_from_row(&row)?)
    }

    async fn update(
        &self,
        id: i64,
        paciente_id: i64,
        draft: &AtencionDraft,
    ) -> Result<Option<Atencion>, DbError> {
        let row = sqlx::query(&format!(
            r#"
            WITH updated AS (
                UPDATE atencion
                SET fecha_atencion = $2,
                    hora_atencion = $3,
                    costo = $4,
                    comentario = $5,
                    id_paciente = $6
                WHERE id = $1
                RETURNING *
            )
            SELECT {}
            FROM updated a
            JOIN paciente p ON p.id = a.id_paciente
            "#,
            JOINED_COLUMNS
        ))
        .bind(id)
        .bind(draft.fecha_atencion.as_deref())
        .bind(draft.hora_atencion.as_deref())
        .bind(draft.costo)
        .bind(draft.comentario.as_deref())
        .bind(paciente_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(atencion_from_row).transpose()?)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM atencion WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
