//! Patient endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::repos::NameQuery;
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Paciente, PacienteDraft};
use crate::service::PacienteService;

/// GET /pacientes - list all patients
async fn list_pacientes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Paciente>>, ApiError> {
    let pacientes = PacienteService::new(state.pacientes.as_ref()).list().await?;
    Ok(Json(pacientes))
}

/// POST /pacientes - create, or return the patient already holding this RUN
async fn create_paciente(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<PacienteDraft>,
) -> Result<(StatusCode, Json<Paciente>), ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref())
        .create(&draft)
        .await?;

    Ok((StatusCode::CREATED, Json(paciente)))
}

/// GET /pacientes/{id}
async fn get_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Paciente>, ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref()).get(id).await?;
    Ok(Json(paciente))
}

/// PUT /pacientes/{id} - full replace
async fn replace_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    Json(draft): Json<PacienteDraft>,
) -> Result<Json<Paciente>, ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref())
        .replace(id, &draft)
        .await?;

    Ok(Json(paciente))
}

/// PATCH /pacientes/{id} - merge the fields present in the body
async fn patch_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    Json(patch): Json<PacienteDraft>,
) -> Result<Json<Paciente>, ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref())
        .patch(id, &patch)
        .await?;

    Ok(Json(paciente))
}

/// DELETE /pacientes/{id}
async fn delete_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    PacienteService::new(state.pacientes.as_ref()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search(
    state: &AppState,
    nombre: &str,
    query: NameQuery,
) -> Result<Json<Vec<Paciente>>, ApiError> {
    let pacientes = PacienteService::new(state.pacientes.as_ref())
        .search_by_nombre(nombre, query)
        .await?;

    if pacientes.is_empty() {
        return Err(ApiError::NotFound {
            resource: "paciente",
            id: nombre.to_owned(),
        });
    }

    Ok(Json(pacientes))
}

/// GET /pacientes/buscar/jpql/{nombre} - typed name lookup, 404 when empty
async fn search_mapped(
    State(state): State<Arc<AppState>>,
    Path(nombre): Path<String>,
) -> Result<Json<Vec<Paciente>>, ApiError> {
    search(&state, &nombre, NameQuery::Mapped).await
}

/// GET /pacientes/buscar/native/{nombre} - raw SQL name lookup, 404 when empty
async fn search_native(
    State(state): State<Arc<AppState>>,
    Path(nombre): Path<String>,
) -> Result<Json<Vec<Paciente>>, ApiError> {
    search(&state, &nombre, NameQuery::Native).await
}

/// GET /pacientes/correo/{correo}
async fn get_by_correo(
    State(state): State<Arc<AppState>>,
    Path(correo): Path<String>,
) -> Result<Json<Paciente>, ApiError> {
    let paciente = PacienteService::new(state.pacientes.as_ref())
        .find_by_correo(&correo)
        .await?;

    Ok(Json(paciente))
}

/// Patient routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pacientes", get(list_pacientes).post(create_paciente))
        .route(
            "/pacientes/{id}",
            get(get_paciente)
                .put(replace_paciente)
                .patch(patch_paciente)
                .delete(delete_paciente),
        )
        .route("/pacientes/buscar/jpql/{nombre}", get(search_mapped))
        .route("/pacientes/buscar/native/{nombre}", get(search_native))
        .route("/pacientes/correo/{correo}", get(get_by_correo))
}
