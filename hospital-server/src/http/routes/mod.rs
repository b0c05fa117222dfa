//! Route handlers organized by resource

pub mod atenciones;
pub mod health;
pub mod pacientes;
pub mod pacientes_v2;
