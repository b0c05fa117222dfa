//! Patient endpoints wrapped in the versioned `Resource` envelope
//!
//! Same semantics as `/pacientes`; every patient comes back with its
//! `self`, `collection` and `create` links.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Links, Paciente, PacienteDraft, Resource};
use crate::service::PacienteService;

/// Collection path for this router
pub const BASE: &str = "/v2/pacientes";

fn to_resource(paciente: Paciente) -> Resource<Paciente> {
    let links = Links::for_member(BASE, paciente.id);
    Resource::new(paciente, links)
}

/// GET /v2/pacientes
async fn list_pacientes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Resource<Paciente>>>, ApiError> {
    let pacientes = PacienteService::new(state.pacientes.as_ref()).list().await?;
    Ok(Json(pacientes.into_iter().map(to_resource).collect()))
}

/// POST /v2/pacientes
async fn create_paciente(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<PacienteDraft>,
) -> Result<(StatusCode, Json<Resource<Paciente>>), ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref())
        .create(&draft)
        .await?;

    Ok((StatusCode::CREATED, Json(to_resource(paciente))))
}

/// GET /v2/pacientes/{id}
async fn get_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Resource<Paciente>>, ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref()).get(id).await?;
    Ok(Json(to_resource(paciente)))
}

/// PUT /v2/pacientes/{id}
async fn replace_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    Json(draft): Json<PacienteDraft>,
) -> Result<Json<Resource<Paciente>>, ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref())
        .replace(id, &draft)
        .await?;

    Ok(Json(to_resource(paciente)))
}

/// DELETE /v2/pacientes/{id}
async fn delete_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    PacienteService::new(state.pacientes.as_ref()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Versioned patient routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(BASE, get(list_pacientes).post(create_paciente))
        .route(
            "/v2/pacientes/{id}",
            get(get_paciente).put(replace_paciente).delete(delete_paciente),
        )
}
