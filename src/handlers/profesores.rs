use axum::{
    extract::{Path, State},
    Json,
};

use super::{internal, list_failed, ApiResult};
use crate::database::models::Profesor;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Profesor>>> {
    let rows = state
        .store
        .list_profesores()
        .await
        .map_err(|e| list_failed("profesores", e))?;
    Ok(Json(rows))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Profesor>> {
    state
        .store
        .find_profesor(&id)
        .await
        .map_err(|e| internal("Error al obtener profesor", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Profesor no encontrado"))
}
