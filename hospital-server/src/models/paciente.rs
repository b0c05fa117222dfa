//! Patient (paciente) records
//!
//! `Paciente` is a stored row. `PacienteDraft` is what clients send for
//! create, full replace and partial update: every field is optional and
//! absent fields are left to the storage constraints (create/replace) or
//! keep their stored value (patch).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum length of a RUN, matching the `paciente.run` column.
pub const MAX_RUN_LEN: usize = 13;

/// Patient record from the database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Paciente {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub run: String,
    pub direccion: String,
    pub fecha_nacimiento: String,
    pub correo: String,
}

/// Incoming patient fields. An `id` in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacienteDraft {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub run: Option<String>,
    pub direccion: Option<String>,
    pub fecha_nacimiento: Option<String>,
    pub correo: Option<String>,
}

impl Paciente {
    /// Overwrite each stored field whose counterpart in `patch` is set.
    ///
    /// Unset fields keep their current value; the id never changes.
    pub fn apply_patch(&mut self, patch: &PacienteDraft) {
        if let Some(nombre) = &patch.nombre {
            self.nombre = nombre.clone();
        }
        if let Some(apellido) = &patch.apellido {
            self.apellido = apellido.clone();
        }
        if let Some(run) = &patch.run {
            self.run = run.clone();
        }
        if let Some(direccion) = &patch.direccion {
            self.direccion = direccion.clone();
        }
        if let Some(fecha_nacimiento) = &patch.fecha_nacimiento {
            self.fecha_nacimiento = fecha_nacimiento.clone();
        }
        if let Some(correo) = &patch.correo {
            self.correo = correo.clone();
        }
    }
}

impl From<Paciente> for PacienteDraft {
    fn from(p: Paciente) -> Self {
        Self {
            nombre: Some(p.nombre),
            apellido: Some(p.apellido),
            run: Some(p.run),
            direccion: Some(p.direccion),
            fecha_nacimiento: Some(p.fecha_nacimiento),
            correo: Some(p.correo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Paciente {
        Paciente {
            id: 1,
            nombre: "Ana".into(),
            apellido: "Rojas".into(),
            run: "11111111-1".into(),
            direccion: "Av. Siempre Viva 123".into(),
            fecha_nacimiento: "1990-01-01".into(),
            correo: "ana@example.cl".into(),
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut p = ana();
        p.apply_patch(&PacienteDraft::default());
        assert_eq!(p, ana());
    }

    #[test]
    fn patch_overwrites_only_set_fields() {
        let mut p = ana();
        p.apply_patch(&PacienteDraft {
            apellido: Some("Soto".into()),
            correo: Some("ana.soto@example.cl".into()),
            ..Default::default()
        });

        assert_eq!(p.apellido, "Soto");
        assert_eq!(p.correo, "ana.soto@example.cl");
        assert_eq!(p.nombre, "Ana");
        assert_eq!(p.run, "11111111-1");
        assert_eq!(p.direccion, "Av. Siempre Viva 123");
        assert_eq!(p.fecha_nacimiento, "1990-01-01");
        assert_eq!(p.id, 1);
    }

    #[test]
    fn patch_can_set_empty_string() {
        let mut p = ana();
        p.apply_patch(&PacienteDraft {
            direccion: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(p.direccion, "");
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(ana()).unwrap();
        assert_eq!(json["fechaNacimiento"], "1990-01-01");
        assert!(json.get("fecha_nacimiento").is_none());
    }

    #[test]
    fn draft_ignores_body_id_and_missing_fields() {
        let draft: PacienteDraft =
            serde_json::from_str(r#"{"id": 99, "nombre": "Luis"}"#).unwrap();
        assert_eq!(draft.nombre.as_deref(), Some("Luis"));
        assert!(draft.run.is_none());
        assert!(draft.fecha_nacimiento.is_none());
    }

    #[test]
    fn draft_null_is_absent() {
        let draft: PacienteDraft =
            serde_json::from_str(r#"{"nombre": null, "run": "2-7"}"#).unwrap();
        assert!(draft.nombre.is_none());
        assert_eq!(draft.run.as_deref(), Some("2-7"));
    }
}
