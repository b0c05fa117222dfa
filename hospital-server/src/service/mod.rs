//! Service layer between HTTP handlers and storage

pub mod atenciones;
pub mod pacientes;

pub use atenciones::AtencionService;
pub use pacientes::PacienteService;
