use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A professor teaching one subject in one cycle (`profesores_ciclos_asignaturas`).
///
/// The trailing name fields are read-only join projections. They are absent
/// when the row was read without joins and are never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Asignacion {
    #[serde(rename = "id_")]
    #[sqlx(rename = "id_")]
    pub id: String,
    pub id_profesores_ciclos_asignaturas: String,
    pub id_profesores: String,
    pub id_asignaturas: String,
    pub id_ciclos: String,
    pub version: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub nombre_profesor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub nombre_asignatura: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub ciclo: Option<String>,
}

/// One row of the "available subjects" listing offered to students when enrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AsignaturaDisponible {
    pub id: String,
    pub profesor: String,
    pub asignatura: String,
    pub ciclo: String,
}
