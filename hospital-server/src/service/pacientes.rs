//! Patient service
//!
//! Holds the two pieces of real logic: the RUN upsert guard on create and
//! the field-by-field merge on patch. Everything else delegates to the
//! store and turns an absent row into `DbError::NotFound`.

use crate::db::repos::{DbError, NameQuery, PacienteStore};
use crate::models::{Paciente, PacienteDraft};

const RESOURCE: &str = "paciente";

/// Patient operations over any `PacienteStore`
pub struct PacienteService<'a> {
    store: &'a dyn PacienteStore,
}

impl<'a> PacienteService<'a> {
    pub fn new(store: &'a dyn PacienteStore) -> Self {
        Self { store }
    }

    /// All patients, oldest first. Empty store gives an empty vec.
    pub async fn list(&self) -> Result<Vec<Paciente>, DbError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Paciente, DbError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// Create a patient unless one with the same RUN exists.
    ///
    /// On a RUN collision the stored record is returned untouched; the
    /// incoming fields are discarded. A draft without a RUN skips the
    /// lookup and goes straight to the insert.
    pub async fn create(&self, draft: &PacienteDraft) -> Result<Paciente, DbError> {
        if let Some(run) = draft.run.as_deref() {
            if let Some(existing) = self.store.find_by_run(run).await? {
                tracing::debug!(id = existing.id, run, "run already registered");
                return Ok(existing);
            }
        }

        let paciente = self.store.insert(draft).await?;
        tracing::debug!(id = paciente.id, "paciente created");
        Ok(paciente)
    }

    /// Replace every field of patient `id`. No write when `id` is absent.
    pub async fn replace(&self, id: i64, draft: &PacienteDraft) -> Result<Paciente, DbError> {
        self.store
            .update(id, draft)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    /// Merge the set fields of `patch` onto patient `id` and persist.
    pub async fn patch(&self, id: i64, patch: &PacienteDraft) -> Result<Paciente, DbError> {
        let mut paciente = self.get(id).await?;
        paciente.apply_patch(patch);

        // Row may have been deleted between the read and the write
        self.store
            .update(id, &PacienteDraft::from(paciente))
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(DbError::not_found(RESOURCE, id))
        }
    }

    /// Patients whose `nombre` equals `nombre` exactly.
    pub async fn search_by_nombre(
        &self,
        nombre: &str,
        query: NameQuery,
    ) -> Result<Vec<Paciente>, DbError> {
        self.store.find_by_nombre(nombre, query).await
    }

    pub async fn find_by_correo(&self, correo: &str) -> Result<Paciente, DbError> {
        self.store
            .find_by_correo(correo)
            .await?
            .ok_or_else(|| DbError::not_found(RESOURCE, correo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::MemoryStore;

    fn draft(nombre: &str, run: &str) -> PacienteDraft {
        PacienteDraft {
            nombre: Some(nombre.into()),
            apellido: Some("Rojas".into()),
            run: Some(run.into()),
            direccion: Some("Calle 1".into()),
            fecha_nacimiento: Some("1990-01-01".into()),
            correo: Some(format!("{}@example.cl", nombre.to_lowercase())),
        }
    }

    #[tokio::test]
    async fn list_empty_store() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_returns_existing_on_same_run() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);

        let ana = service.create(&draft("Ana", "11111111-1")).await.unwrap();
        assert_eq!(ana.id, 1);

        let again = service.create(&draft("Beatriz", "11111111-1")).await.unwrap();
        assert_eq!(again, ana);
        assert_eq!(again.nombre, "Ana");
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_without_run_goes_to_storage() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);

        let no_run = PacienteDraft {
            run: None,
            ..draft("Ana", "unused")
        };
        let err = service.create(&no_run).await.unwrap_err();
        assert!(matches!(err, DbError::Constraint { .. }));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);

        let err = service.get(7).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "paciente", .. }));
    }

    #[tokio::test]
    async fn patch_missing_is_not_found_and_writes_nothing() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);

        let err = service
            .patch(1, &PacienteDraft {
                nombre: Some("Nadie".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_missing_is_not_found_and_writes_nothing() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);

        let err = service.replace(3, &draft("Ana", "1-9")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn patch_merges_only_set_fields() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);
        let ana = service.create(&draft("Ana", "11111111-1")).await.unwrap();

        let patched = service
            .patch(ana.id, &PacienteDraft {
                direccion: Some("Los Olmos 45".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(patched.direccion, "Los Olmos 45");
        assert_eq!(patched.nombre, ana.nombre);
        assert_eq!(patched.run, ana.run);
        assert_eq!(patched.correo, ana.correo);
        assert_eq!(service.get(ana.id).await.unwrap(), patched);
    }

    #[tokio::test]
    async fn replace_overwrites_all_fields() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);
        let ana = service.create(&draft("Ana", "11111111-1")).await.unwrap();

        let replaced = service
            .replace(ana.id, &draft("Camila", "22222222-2"))
            .await
            .unwrap();
        assert_eq!(replaced.id, ana.id);
        assert_eq!(replaced.nombre, "Camila");
        assert_eq!(replaced.run, "22222222-2");
    }

    #[tokio::test]
    async fn replace_with_missing_field_is_rejected_by_storage() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);
        let ana = service.create(&draft("Ana", "11111111-1")).await.unwrap();

        let partial = PacienteDraft {
            correo: None,
            ..draft("Ana", "11111111-1")
        };
        let err = service.replace(ana.id, &partial).await.unwrap_err();
        assert!(matches!(err, DbError::Constraint { .. }));
        assert_eq!(service.get(ana.id).await.unwrap(), ana);
    }

    #[tokio::test]
    async fn delete_then_missing() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);
        let ana = service.create(&draft("Ana", "11111111-1")).await.unwrap();

        service.delete(ana.id).await.unwrap();
        assert!(matches!(
            service.delete(ana.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn search_by_nombre_both_modes() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);
        service.create(&draft("Ana", "1-9")).await.unwrap();
        service.create(&draft("Luis", "2-7")).await.unwrap();
        service.create(&draft("Ana", "3-5")).await.unwrap();

        for mode in [NameQuery::Mapped, NameQuery::Native] {
            let found = service.search_by_nombre("Ana", mode).await.unwrap();
            assert_eq!(found.len(), 2);
            assert!(found.iter().all(|p| p.nombre == "Ana"));
        }

        assert!(service
            .search_by_nombre("ana", NameQuery::Mapped)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn find_by_correo() {
        let store = MemoryStore::new();
        let service = PacienteService::new(&store);
        let luis = service.create(&draft("Luis", "2-7")).await.unwrap();

        assert_eq!(service.find_by_correo("luis@example.cl").await.unwrap(), luis);
        assert!(service.find_by_correo("otro@example.cl").await.is_err());
    }
}
