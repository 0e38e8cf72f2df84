use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{internal, list_failed, parse_body, ApiResult};
use crate::database::models::Matricula;
use crate::error::ApiError;
use crate::notifier::notify_logged;
use crate::services::enrollment::{self, EnrollmentError, EnrollmentOutcome};
use crate::state::AppState;
use crate::types::{tables, Operation};

const NOT_FOUND: &str = "Matrícula no encontrada";
const ESTUDIANTE_NOT_FOUND: &str = "Estudiante no encontrado";
const ASIGNACION_NOT_FOUND: &str = "Asignación no encontrada";
const ALREADY_ENROLLED: &str = "El estudiante ya está matriculado en esta asignatura";

#[derive(Debug, Deserialize)]
struct MatriculaInput {
    #[serde(default)]
    id_estudiantes: Option<String>,
    #[serde(default)]
    id_profesores_ciclos_asignaturas: Option<String>,
}

/// Both references, each required non-empty.
struct Refs {
    id_estudiantes: String,
    id_asignacion: String,
}

impl MatriculaInput {
    fn validate(self) -> ApiResult<Refs> {
        let id_estudiantes = self.id_estudiantes.unwrap_or_default();
        let id_asignacion = self.id_profesores_ciclos_asignaturas.unwrap_or_default();
        if id_estudiantes.is_empty() || id_asignacion.is_empty() {
            return Err(ApiError::bad_request("Todos los campos son requeridos"));
        }
        Ok(Refs {
            id_estudiantes,
            id_asignacion,
        })
    }
}

/// GET /matriculas
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Matricula>>> {
    let rows = state
        .store
        .list_matriculas()
        .await
        .map_err(|e| list_failed("matrículas", e))?;
    Ok(Json(rows))
}

/// GET /matriculas/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Matricula>> {
    state
        .store
        .find_matricula(&id)
        .await
        .map_err(|e| internal("Error al obtener matrícula", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /matriculas - enrollment plus its blank grade record
pub async fn create(State(state): State<AppState>, body: Bytes) -> ApiResult<(StatusCode, Json<Matricula>)> {
    let input = parse_body::<MatriculaInput>(&body)?.validate()?;

    let outcome = enrollment::create(state.store.as_ref(), &input.id_estudiantes, &input.id_asignacion)
        .await
        .map_err(|e| match e {
            EnrollmentError::EstudianteNotFound(_) => ApiError::not_found(ESTUDIANTE_NOT_FOUND),
            EnrollmentError::AsignacionNotFound(_) => ApiError::not_found(ASIGNACION_NOT_FOUND),
            EnrollmentError::AlreadyEnrolled { .. } => ApiError::bad_request(ALREADY_ENROLLED),
            other => internal("Error al crear matrícula", other),
        })?;

    match outcome {
        EnrollmentOutcome::Committed { matricula, .. } => {
            notify_logged(state.notifier.as_ref(), Operation::Create, tables::MATRICULAS, &matricula).await;
            Ok((StatusCode::CREATED, Json(matricula)))
        }
        // A failed cleanup has already been logged with the orphan's id.
        EnrollmentOutcome::RolledBackOk { cause } | EnrollmentOutcome::RolledBackFailed { cause, .. } => {
            Err(internal("Error al crear registro de notas", cause))
        }
    }
}

/// PUT /matriculas/:id - re-point an enrollment at another student or assignment
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Matricula>> {
    let input = parse_body::<MatriculaInput>(&body)?.validate()?;

    const FAILED: &str = "Error al actualizar matrícula";
    let store = state.store.as_ref();

    let current = store
        .find_matricula_row(&id)
        .await
        .map_err(|e| internal(FAILED, e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    if store
        .find_estudiante(&input.id_estudiantes)
        .await
        .map_err(|e| internal(FAILED, e))?
        .is_none()
    {
        return Err(ApiError::not_found(ESTUDIANTE_NOT_FOUND));
    }

    if store
        .find_asignacion_row(&input.id_asignacion)
        .await
        .map_err(|e| internal(FAILED, e))?
        .is_none()
    {
        return Err(ApiError::not_found(ASIGNACION_NOT_FOUND));
    }

    let others = store
        .count_matriculas_for_pair(&input.id_estudiantes, &input.id_asignacion, Some(&id))
        .await
        .map_err(|e| internal(FAILED, e))?;
    if others > 0 {
        return Err(ApiError::bad_request(ALREADY_ENROLLED));
    }

    let updated = Matricula::new(
        current.id,
        current.id_matriculas,
        input.id_estudiantes,
        input.id_asignacion,
        current.version + 1,
    );

    store
        .update_matricula(
            &updated.id_matriculas,
            &updated.id_estudiantes,
            &updated.id_profesores_ciclos_asignaturas,
            updated.version,
        )
        .await
        .map_err(|e| internal(FAILED, e))?;

    notify_logged(state.notifier.as_ref(), Operation::Update, tables::MATRICULAS, &updated).await;

    Ok(Json(updated))
}

/// DELETE /matriculas/:id - grade record first, then the enrollment
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    const FAILED: &str = "Error al eliminar matrícula";
    let store = state.store.as_ref();

    let matricula = store
        .find_matricula_row(&id)
        .await
        .map_err(|e| internal(FAILED, e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    let nota = store
        .find_nota_by_matricula(&id)
        .await
        .map_err(|e| internal(FAILED, e))?;

    if let Some(nota) = nota {
        store
            .delete_notas_by_matricula(&id)
            .await
            .map_err(|e| internal("Error al eliminar registro de notas", e))?;
        notify_logged(state.notifier.as_ref(), Operation::Delete, tables::REGISTRO_NOTAS, &nota).await;
    }

    store
        .delete_matricula(&id)
        .await
        .map_err(|e| internal(FAILED, e))?;

    notify_logged(state.notifier.as_ref(), Operation::Delete, tables::MATRICULAS, &matricula).await;

    Ok(Json(json!({ "message": "Matrícula eliminada correctamente" })))
}
