use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A student's enrollment in one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Matricula {
    #[serde(rename = "id_")]
    #[sqlx(rename = "id_")]
    pub id: String,
    pub id_matriculas: String,
    pub id_estudiantes: String,
    pub id_profesores_ciclos_asignaturas: String,
    pub version: i32,

    // Join projections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub nombre_estudiante: Option<String>,
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

impl Matricula {
    /// A freshly written row: no projections, version as given.
    pub fn new(
        id: String,
        id_matriculas: String,
        id_estudiantes: String,
        id_profesores_ciclos_asignaturas: String,
        version: i32,
    ) -> Self {
        Self {
            id,
            id_matriculas,
            id_estudiantes,
            id_profesores_ciclos_asignaturas,
            version,
            nombre_estudiante: None,
            nombre_profesor: None,
            nombre_asignatura: None,
            ciclo: None,
        }
    }
}
