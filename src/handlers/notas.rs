use axum::{
    extract::{Path, State},
    Json,
};

use super::{internal, list_failed, ApiResult};
use crate::database::models::RegistroNotas;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /notas
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<RegistroNotas>>> {
    let rows = state
        .store
        .list_notas()
        .await
        .map_err(|e| list_failed("notas", e))?;
    Ok(Json(rows))
}

/// GET /notas/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<RegistroNotas>> {
    state
        .store
        .find_nota(&id)
        .await
        .map_err(|e| internal("Error al obtener registro de notas", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Registro de notas no encontrado"))
}

/// GET /notas-estudiante/:id - every grade record of one student
pub async fn by_estudiante(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<RegistroNotas>>> {
    const FAILED: &str = "Error al obtener notas del estudiante";

    if state
        .store
        .find_estudiante(&id)
        .await
        .map_err(|e| internal(FAILED, e))?
        .is_none()
    {
        return Err(ApiError::not_found("Estudiante no encontrado"));
    }

    let rows = state.store.list_notas_by_estudiante(&id).await.map_err(|e| {
        if e.is_decode() {
            list_failed("notas", e)
        } else {
            internal(FAILED, e)
        }
    })?;
    Ok(Json(rows))
}
