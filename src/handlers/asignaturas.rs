use axum::{
    extract::{Path, State},
    Json,
};

use super::{internal, list_failed, ApiResult};
use crate::database::models::Asignatura;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /asignaturas
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Asignatura>>> {
    let rows = state
        .store
        .list_asignaturas()
        .await
        .map_err(|e| list_failed("asignaturas", e))?;
    Ok(Json(rows))
}

/// GET /asignaturas/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Asignatura>> {
    state
        .store
        .find_asignatura(&id)
        .await
        .map_err(|e| internal("Error al obtener asignatura", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Asignatura no encontrada"))
}
