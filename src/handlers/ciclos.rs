use axum::{
    extract::{Path, State},
    Json,
};

use super::{internal, list_failed, ApiResult};
use crate::database::models::Ciclo;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Ciclo>>> {
    let rows = state
        .store
        .list_ciclos()
        .await
        .map_err(|e| list_failed("ciclos", e))?;
    Ok(Json(rows))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Ciclo>> {
    state
        .store
        .find_ciclo(&id)
        .await
        .map_err(|e| internal("Error al obtener ciclo", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Ciclo no encontrado"))
}
