//! Patient repository (PostgreSQL)

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{DbError, NameQuery, PacienteStore};
use crate::models::{Paciente, PacienteDraft};

const COLUMNS: &str = "id, nombre, apellido, run, direccion, fecha_nacimiento, correo";

/// Patient repository
#[derive(Clone)]
pub struct PgPacienteRepo {
    pool: PgPool,
}

impl PgPacienteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Extract a patient from an untyped row.
fn paciente_from_row(row: &PgRow) -> Result<Paciente, sqlx::Error> {
    Ok(Paciente {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        apellido: row.try_get("apellido")?,
        run: row.try_get("run")?,
        direccion: row.try_get("direccion")?,
        fecha_nacimiento: row.try_get("fecha_nacimiento")?,
        correo: row.try_get("correo")?,
    })
}

#[async_trait]
impl PacienteStore for PgPacienteRepo {
    async fn list(&self) -> Result<Vec<Paciente>, DbError> {
        let rows = sqlx::query_as::<_, Paciente>(&format!(
            "SELECT {} FROM paciente ORDER BY id",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Paciente>, DbError> {
        let row = sqlx::query_as::<_, Paciente>(&format!(
            "SELECT {} FROM paciente WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_run(&self, run: &str) -> Result<Option<Paciente>, DbError> {
        let row = sqlx::query_as::<_, Paciente>(&format!(
            "SELECT {} FROM paciente WHERE run = $1",
            COLUMNS
        ))
        .bind(run)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_correo(&self, correo: &str) -> Result<Option<Paciente>, DbError> {
        // correo is not unique; take the oldest match
        let row = sqlx::query_as::<_, Paciente>(&format!(
            "SELECT {} FROM paciente WHERE correo = $1 ORDER BY id LIMIT 1",
            COLUMNS
        ))
        .bind(correo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_nombre(
        &self,
        nombre: &str,
        query: NameQuery,
    ) -> Result<Vec<Paciente>, DbError> {
        match query {
            NameQuery::Mapped => {
                let rows = sqlx::query_as::<_, Paciente>(&format!(
                    "SELECT {} FROM paciente WHERE nombre = $1 ORDER BY id",
                    COLUMNS
                ))
                .bind(nombre)
                .fetch_all(&self.pool)
                .await?;

                Ok(rows)
            }
            NameQuery::Native => {
                let rows = sqlx::query("SELECT * FROM paciente WHERE nombre = $1 ORDER BY id")
                    .bind(nombre)
                    .fetch_all(&self.pool)
                    .await?;

                let pacientes = rows
                    .iter()
                    .map(paciente_from_row)
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(pacientes)
            }
        }
    }

    async fn insert(&self, draft: &PacienteDraft) -> Result<Paciente, DbError> {
        let paciente = sqlx::query_as::<_, Paciente>(&format!(
            r#"
            INSERT INTO paciente (nombre, apellido, run, direccion, fecha_nacimiento, correo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(draft.nombre.as_deref())
        .bind(draft.apellido.as_deref())
        .bind(draft.run.as_deref())
        .bind(draft.direccion.as_deref())
        .bind(draft.fecha_nacimiento.as_deref())
        .bind(draft.correo.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(paciente)
    }

    async fn update(&self, id: i64, draft: &PacienteDraft) -> Result<Option<Paciente>, DbError> {
        let paciente = sqlx::query_as::<_, Paciente>(&format!(
            r#"
            UPDATE paciente
            SET nombre = $2,
                apellido = $3,
                run = $4,
                direccion = $5,
                fecha_nacimiento = $6,
                correo = $7
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id)
        .bind(draft.nombre.as_deref())
        .bind(draft.apellido.as_deref())
        .bind(draft.run.as_deref())
        .bind(draft.direccion.as_deref())
        .bind(draft.fecha_nacimiento.as_deref())
        .bind(draft.correo.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(paciente)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM paciente WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p hospital-server -- --ignored

    async fn repo() -> PgPacienteRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        PgPacienteRepo::new(pool)
    }

    fn draft(run: &str, nombre: &str) -> PacienteDraft {
        PacienteDraft {
            nombre: Some(nombre.into()),
            apellido: Some("Prueba".into()),
            run: Some(run.into()),
            direccion: Some("Calle 1".into()),
            fecha_nacimiento: Some("2000-02-02".into()),
            correo: Some(format!("{}@example.cl", run)),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_then_find_by_run() {
        let repo = repo().await;
        let created = repo.insert(&draft("99999991-1", "Pia")).await.unwrap();

        let found = repo.find_by_run("99999991-1").await.unwrap().unwrap();
        assert_eq!(found, created);

        assert!(repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn mapped_and_native_name_queries_agree() {
        let repo = repo().await;
        let created = repo.insert(&draft("99999992-2", "Bruno")).await.unwrap();

        let mapped = repo.find_by_nombre("Bruno", NameQuery::Mapped).await.unwrap();
        let native = repo.find_by_nombre("Bruno", NameQuery::Native).await.unwrap();
        assert_eq!(mapped, native);
        assert!(mapped.iter().any(|p| p.id == created.id));

        repo.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_row_is_none() {
        let repo = repo().await;
        let result = repo.update(i64::MAX, &draft("99999993-3", "X")).await.unwrap();
        assert!(result.is_none());
    }
}
