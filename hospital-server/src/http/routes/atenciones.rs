//! Visit endpoints
//!
//! Full replace and delete of visits exist in `AtencionService` but have no
//! route here.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::models::{Atencion, AtencionDraft};
use crate::service::AtencionService;

fn service(state: &AppState) -> AtencionService<'_> {
    AtencionService::new(state.atenciones.as_ref(), state.pacientes.as_ref())
}

/// GET /atenciones - list all visits
async fn list_atenciones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Atencion>>, ApiError> {
    let atenciones = service(&state).list().await?;
    Ok(Json(atenciones))
}

/// POST /atenciones - create a visit for `paciente.id` in the body
async fn create_atencion(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<AtencionDraft>,
) -> Result<(StatusCode, Json<Atencion>), ApiError> {
    let atencion = service(&state).create(&draft).await?;
    Ok((StatusCode::CREATED, Json(atencion)))
}

/// GET /atenciones/{id}
async fn get_atencion(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Atencion>, ApiError> {
    let atencion = service(&state).get(id).await?;
    Ok(Json(atencion))
}

/// GET /atenciones/pacientes/{id} - visits of one patient, 404 when none
async fn list_by_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(paciente_id): ValidId,
) -> Result<Json<Vec<Atencion>>, ApiError> {
    tracing::debug!(paciente_id, "listing atenciones for paciente");

    let atenciones = service(&state).list_by_paciente(paciente_id).await?;
    if atenciones.is_empty() {
        tracing::warn!(paciente_id, "no atenciones found for paciente");
        return Err(ApiError::NotFound {
            resource: "atencion",
            id: format!("paciente {}", paciente_id),
        });
    }

    tracing::info!(paciente_id, count = atenciones.len(), "atenciones found for paciente");
    Ok(Json(atenciones))
}

/// POST /atenciones/pacientes/{id} - create a visit for the path patient
async fn create_for_paciente(
    State(state): State<Arc<AppState>>,
    ValidId(paciente_id): ValidId,
    Json(draft): Json<AtencionDraft>,
) -> Result<(StatusCode, Json<Atencion>), ApiError> {
    let atencion = service(&state)
        .create_for_paciente(paciente_id, &draft)
        .await?;

    Ok((StatusCode::CREATED, Json(atencion)))
}

/// Visit routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/atenciones", get(list_atenciones).post(create_atencion))
        .route("/atenciones/{id}", get(get_atencion))
        .route(
            "/atenciones/pacientes/{id}",
            get(list_by_paciente).post(create_for_paciente),
        )
}
