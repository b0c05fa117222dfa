//! Visit (atencion) records
//!
//! A visit always belongs to exactly one patient. Responses embed the full
//! patient record; requests only reference it by id.

use serde::{Deserialize, Serialize};

use super::Paciente;

/// Visit record joined with its patient
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Atencion {
    pub id: i64,
    pub fecha_atencion: String,
    pub hora_atencion: String,
    pub costo: f64,
    pub comentario: Option<String>,
    pub paciente: Paciente,
}

/// Reference to an existing patient inside a visit body.
///
/// Only `id` is read; any other patient fields sent along are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PacienteRef {
    pub id: i64,
}

/// Incoming visit fields
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtencionDraft {
    pub fecha_atencion: Option<String>,
    pub hora_atencion: Option<String>,
    pub costo: Option<f64>,
    pub comentario: Option<String>,
    pub paciente: Option<PacienteRef>,
}

impl AtencionDraft {
    /// Id of the referenced patient, if the body named one.
    pub fn paciente_id(&self) -> Option<i64> {
        self.paciente.map(|p| p.id)
    }
}
