//! Domain models and request payloads
//!
//! Invalid input returns ValidationError, not panic.

pub mod atencion;
pub mod links;
pub mod paciente;
pub mod validation;

pub use atencion::{Atencion, AtencionDraft, PacienteRef};
pub use links::{Links, Resource, API_VERSION};
pub use paciente::{Paciente, PacienteDraft, MAX_RUN_LEN};
pub use validation::{parse_id, ValidationError};
