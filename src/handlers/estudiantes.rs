use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{internal, list_failed, parse_body, ApiResult};
use crate::database::models::Estudiante;
use crate::error::ApiError;
use crate::ids;
use crate::notifier::notify_logged;
use crate::state::AppState;
use crate::types::{tables, Operation};

const NOT_FOUND: &str = "Estudiante no encontrado";

#[derive(Debug, Deserialize)]
struct EstudianteInput {
    #[serde(default)]
    nombre: Option<String>,
}

impl EstudianteInput {
    /// The name, required non-empty. `null` counts as empty.
    fn nombre(self) -> ApiResult<String> {
        match self.nombre {
            Some(nombre) if !nombre.is_empty() => Ok(nombre),
            _ => Err(ApiError::bad_request("El nombre es requerido")),
        }
    }
}

/// GET /estudiantes
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Estudiante>>> {
    let rows = state
        .store
        .list_estudiantes()
        .await
        .map_err(|e| list_failed("estudiantes", e))?;
    Ok(Json(rows))
}

/// GET /estudiantes/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Estudiante>> {
    state
        .store
        .find_estudiante(&id)
        .await
        .map_err(|e| internal("Error al obtener estudiante", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /estudiantes - answers with the stored row as written, version 1
pub async fn create(State(state): State<AppState>, body: Bytes) -> ApiResult<(StatusCode, Json<Estudiante>)> {
    let nombre = parse_body::<EstudianteInput>(&body)?.nombre()?;

    const FAILED: &str = "Error al crear estudiante";
    let estudiante = Estudiante {
        id: ids::generate().map_err(|e| internal(FAILED, e))?,
        id_estudiantes: ids::generate().map_err(|e| internal(FAILED, e))?,
        nombre,
        version: 1,
    };

    state
        .store
        .insert_estudiante(&estudiante)
        .await
        .map_err(|e| internal(FAILED, e))?;

    notify_logged(state.notifier.as_ref(), Operation::Create, tables::ESTUDIANTES, &estudiante).await;

    Ok((StatusCode::CREATED, Json(estudiante)))
}

/// PUT /estudiantes/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Estudiante>> {
    let nombre = parse_body::<EstudianteInput>(&body)?.nombre()?;

    const FAILED: &str = "Error al actualizar estudiante";
    let current = state
        .store
        .find_estudiante(&id)
        .await
        .map_err(|e| internal(FAILED, e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    let updated = Estudiante {
        nombre,
        version: current.version + 1,
        ..current
    };

    state
        .store
        .update_estudiante(&updated.id_estudiantes, &updated.nombre, updated.version)
        .await
        .map_err(|e| internal(FAILED, e))?;

    notify_logged(state.notifier.as_ref(), Operation::Update, tables::ESTUDIANTES, &updated).await;

    Ok(Json(updated))
}

/// DELETE /estudiantes/:id - refused while any enrollment references the student
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    const FAILED: &str = "Error al eliminar estudiante";
    let estudiante = state
        .store
        .find_estudiante(&id)
        .await
        .map_err(|e| internal(FAILED, e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    let enrolled = state
        .store
        .count_matriculas_by_estudiante(&id)
        .await
        .map_err(|e| internal(FAILED, e))?;
    if enrolled > 0 {
        return Err(ApiError::bad_request(
            "No se puede eliminar el estudiante porque tiene matrículas",
        ));
    }

    state
        .store
        .delete_estudiante(&id)
        .await
        .map_err(|e| internal(FAILED, e))?;

    notify_logged(state.notifier.as_ref(), Operation::Delete, tables::ESTUDIANTES, &estudiante).await;

    Ok(Json(json!({ "message": "Estudiante eliminado correctamente" })))
}
