//! In-process storage
//!
//! Mirrors the PostgreSQL schema closely enough that services behave the
//! same against either backend: sequential ids from 1, NOT NULL checks,
//! UNIQUE(run), run length, and the atencion -> paciente foreign key
//! (no cascade).

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AtencionStore, DbError, NameQuery, PacienteStore};
use crate::models::{Atencion, AtencionDraft, Paciente, PacienteDraft, MAX_RUN_LEN};

/// Visit row as stored: the patient is a foreign key, not a copy.
#[derive(Debug, Clone)]
struct AtencionRow {
    id: i64,
    fecha_atencion: String,
    hora_atencion: String,
    costo: f64,
    comentario: Option<String>,
    id_paciente: i64,
}

#[derive(Debug, Default)]
struct Tables {
    pacientes: BTreeMap<i64, Paciente>,
    atenciones: BTreeMap<i64, AtencionRow>,
    next_paciente_id: i64,
    next_atencion_id: i64,
}

impl Tables {
    fn join(&self, row: &AtencionRow) -> Result<Atencion, DbError> {
        let paciente = self.pacientes.get(&row.id_paciente).ok_or_else(|| {
            DbError::Constraint {
                constraint: "atencion_id_paciente_fkey",
                message: format!("paciente {} does not exist", row.id_paciente),
            }
        })?;

        Ok(Atencion {
            id: row.id,
            fecha_atencion: row.fecha_atencion.clone(),
            hora_atencion: row.hora_atencion.clone(),
            costo: row.costo,
            comentario: row.comentario.clone(),
            paciente: paciente.clone(),
        })
    }

    /// Build a patient row, checking the same constraints as the table.
    fn paciente_row(&self, id: i64, draft: &PacienteDraft) -> Result<Paciente, DbError> {
        let run = required(&draft.run, "run")?;
        if run.chars().count() > MAX_RUN_LEN {
            return Err(DbError::Constraint {
                constraint: "paciente_run_length",
                message: format!("run exceeds {} characters", MAX_RUN_LEN),
            });
        }
        if self
            .pacientes
            .values()
            .any(|p| p.run == run && p.id != id)
        {
            return Err(DbError::Constraint {
                constraint: "paciente_run_key",
                message: format!("run '{}' already exists", run),
            });
        }

        Ok(Paciente {
            id,
            nombre: required(&draft.nombre, "nombre")?,
            apellido: required(&draft.apellido, "apellido")?,
            run,
            direccion: required(&draft.direccion, "direccion")?,
            fecha_nacimiento: required(&draft.fecha_nacimiento, "fecha_nacimiento")?,
            correo: required(&draft.correo, "correo")?,
        })
    }

    fn atencion_row(
        &self,
        id: i64,
        paciente_id: i64,
        draft: &AtencionDraft,
    ) -> Result<AtencionRow, DbError> {
        if !self.pacientes.contains_key(&paciente_id) {
            return Err(DbError::Constraint {
                constraint: "atencion_id_paciente_fkey",
                message: format!("paciente {} does not exist", paciente_id),
            });
        }

        Ok(AtencionRow {
            id,
            fecha_atencion: required(&draft.fecha_atencion, "fecha_atencion")?,
            hora_atencion: required(&draft.hora_atencion, "hora_atencion")?,
            costo: draft.costo.ok_or_else(|| not_null("costo"))?,
            comentario: draft.comentario.clone(),
            id_paciente: paciente_id,
        })
    }
}

fn not_null(column: &'static str) -> DbError {
    DbError::Constraint {
        constraint: "not_null",
        message: format!("null value in column \"{}\"", column),
    }
}

fn required(value: &Option<String>, column: &'static str) -> Result<String, DbError> {
    value.clone().ok_or_else(|| not_null(column))
}

/// In-memory tables shared by both store traits
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PacienteStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Paciente>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.pacientes.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Paciente>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.pacientes.get(&id).cloned())
    }

    async fn find_by_run(&self, run: &str) -> Result<Option<Paciente>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.pacientes.values().find(|p| p.run == run).cloned())
    }

    async fn find_by_correo(&self, correo: &str) -> Result<Option<Paciente>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.pacientes.values().find(|p| p.correo == correo).cloned())
    }

    async fn find_by_nombre(
        &self,
        nombre: &str,
        _query: NameQuery,
    ) -> Result<Vec<Paciente>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pacientes
            .values()
            .filter(|p| p.nombre == nombre)
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: &PacienteDraft) -> Result<Paciente, DbError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_paciente_id + 1;
        let paciente = tables.paciente_row(id, draft)?;

        tables.next_paciente_id = id;
        tables.pacientes.insert(id, paciente.clone());
        Ok(paciente)
    }

    async fn update(&self, id: i64, draft: &PacienteDraft) -> Result<Option<Paciente>, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.pacientes.contains_key(&id) {
            return Ok(None);
        }

        let paciente = tables.paciente_row(id, draft)?;
        tables.pacientes.insert(id, paciente.clone());
        Ok(Some(paciente))
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        if tables.atenciones.values().any(|a| a.id_paciente == id) {
            return Err(DbError::Constraint {
                constraint: "atencion_id_paciente_fkey",
                message: format!("paciente {} is still referenced by atencion", id),
            });
        }

        Ok(tables.pacientes.remove(&id).is_some())
    }
}

#[async_trait]
impl AtencionStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Atencion>, DbError> {
        let tables = self.tables.read().await;
        tables.atenciones.values().map(|row| tables.join(row)).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Atencion>, DbError> {
        let tables = self.tables.read().await;
        tables.atenciones.get(&id).map(|row| tables.join(row)).transpose()
    }

    async fn list_by_paciente(&self, paciente_id: i64) -> Result<Vec<Atencion>, DbError> {
        let tables = self.tables.read().await;
        tables
            .atenciones
            .values()
            .filter(|row| row.id_paciente == paciente_id)
            .map(|row| tables.join(row))
            .collect()
    }

    async fn insert(&self, paciente_id: i64, draft: &AtencionDraft) -> Result<Atencion, DbError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_atencion_id + 1;
        let row = tables.atencion_row(id, paciente_id, draft)?;
        let atencion = tables.join(&row)?;

        tables.next_atencion_id = id;
        tables.atenciones.insert(id, row);
        Ok(atencion)
    }

    async fn update(
        &self,
        id: i64,
        paciente_id: i64,
        draft: &AtencionDraft,
    ) -> Result<Option<Atencion>, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.atenciones.contains_key(&id) {
            return Ok(None);
        }

        let row = tables.atencion_row(id, paciente_id, draft)?;
        let atencion = tables.join(&row)?;
        tables.atenciones.insert(id, row);
        Ok(Some(atencion))
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        Ok(tables.atenciones.remove(&id).is_some())
    }
}
