use axum::{
    extract::{Path, State},
    Json,
};

use super::{internal, list_failed, ApiResult};
use crate::database::models::{Asignacion, AsignaturaDisponible};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /asignaciones - with professor, subject and cycle names joined in
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Asignacion>>> {
    let rows = state
        .store
        .list_asignaciones()
        .await
        .map_err(|e| list_failed("asignaciones", e))?;
    Ok(Json(rows))
}

/// GET /asignaciones/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Asignacion>> {
    state
        .store
        .find_asignacion(&id)
        .await
        .map_err(|e| internal("Error al obtener asignación", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Asignación no encontrada"))
}

/// GET /asignaturas-disponibles - what a student can enroll in
pub async fn disponibles(State(state): State<AppState>) -> ApiResult<Json<Vec<AsignaturaDisponible>>> {
    let rows = state
        .store
        .list_asignaturas_disponibles()
        .await
        .map_err(|e| list_failed("asignaturas disponibles", e))?;
    Ok(Json(rows))
}
