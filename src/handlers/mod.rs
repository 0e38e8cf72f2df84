// Resource handlers, one module per table exposed over HTTP.
//
// Handlers return `ApiResult<T>`: the success value is the JSON response and
// every failure is an `ApiError` rendered as a plain-text body.

pub mod asignaciones;
pub mod asignaturas;
pub mod ciclos;
pub mod estudiantes;
pub mod matriculas;
pub mod notas;
pub mod profesores;
pub mod status;

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::error;

use crate::database::StoreError;
use crate::error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Decode a JSON request body. Any failure is "Datos inválidos".
///
/// The body is taken as raw bytes instead of `Json<T>` so that a missing
/// content type or malformed JSON both produce the same plain-text 400.
/// Only objects are accepted; derived structs would otherwise also read
/// positional arrays. A bare `null` leaves every field at its default.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(Value::Null) => Map::new(),
        _ => return Err(ApiError::invalid_body()),
    };
    serde_json::from_value(Value::Object(fields)).map_err(|_| ApiError::invalid_body())
}

/// Map a failed listing query onto the resource's list error.
pub(crate) fn list_failed(resource: &str, err: StoreError) -> ApiError {
    error!("Listing {} failed: {}", resource, err);
    if err.is_decode() {
        ApiError::internal_server_error(format!("Error al procesar datos de {}", resource))
    } else {
        ApiError::internal_server_error(format!("Error al obtener {}", resource))
    }
}

/// Log the cause and answer 500 with `message`.
pub(crate) fn internal(message: &str, err: impl std::fmt::Display) -> ApiError {
    error!("{}: {}", message, err);
    ApiError::internal_server_error(message)
}
