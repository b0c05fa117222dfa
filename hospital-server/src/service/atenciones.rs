//! Visit service
//!
//! A visit is only written once its patient has been resolved through
//! `PacienteService`.

use super::PacienteService;
use crate::db::repos::{AtencionStore, DbError, PacienteStore};
use crate::models::{Atencion, AtencionDraft};

const RESOURCE: &str = "atencion";

/// Visit operations
pub struct AtencionService<'a> {
    store: &'a dyn AtencionStore,
    pacientes: PacienteService<'a>,
}

impl<'a> AtencionService<'a> {
    pub fn new(store: &'a dyn AtencionStore, pacientes: &'a dyn PacienteStore) -> Self {
        Self {
            store,
            pacientes: PacienteService::new(pacientes),
        }
    }

    pub async fn list(&self) -> Result<Vec<Atencion>, DbError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Atencion, DbError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// Create a visit for the patient referenced inside the draft.
    pub async fn create(&self, draft: &AtencionDraft) -> Result<Atencion, DbError> {
        let paciente_id = draft
            .paciente_id()
            .ok_or_else(|| DbError::not_found("paciente", "null"))?;

        self.create_for_paciente(paciente_id, draft).await
    }

    /// Create a visit for `paciente_id`, ignoring any reference in the draft.
    pub async fn create_for_paciente(
        &self,
        paciente_id: i64,
        draft: &AtencionDraft,
    ) -> Result<Atencion, DbError> {
        let paciente = self.pacientes.get(paciente_id).await?;
        let atencion = self.store.insert(paciente.id, draft).await?;

        tracing::debug!(id = atencion.id, paciente_id, "atencion created");
        Ok(atencion)
    }

    /// Visits of one patient, oldest first. Unknown patients give an empty vec.
    pub async fn list_by_paciente(&self, paciente_id: i64) -> Result<Vec<Atencion>, DbError> {
        self.store.list_by_paciente(paciente_id).await
    }

    /// Full replace of visit `id`.
    ///
    /// Keeps the current patient when the draft names none; a named patient
    /// must exist. Not exposed over HTTP.
    pub async fn replace(&self, id: i64, draft: &AtencionDraft) -> Result<Atencion, DbError> {
        let current = self.get(id).await?;
        let paciente_id = match draft.paciente_id() {
            Some(paciente_id) => self.pacientes.get(paciente_id).await?.id,
            None => current.paciente.id,
        };

        self.store
            .update(id, paciente_id, draft)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// Not exposed over HTTP.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(DbError::not_found(RESOURCE, id))
        }
    }
}
