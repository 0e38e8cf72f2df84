use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Grade record (`registro_notas`), the 1:1 child of an enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RegistroNotas {
    #[serde(rename = "id_")]
    #[sqlx(rename = "id_")]
    pub id: String,
    pub id_registro_notas: String,
    pub id_matriculas: String,
    pub nota1: f64,
    pub nota2: f64,
    /// Supplementary (makeup) exam flag.
    pub sup: i32,
    pub version: i32,

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

impl RegistroNotas {
    /// The empty grade record created alongside a new enrollment.
    pub fn blank(id: String, id_registro_notas: String, id_matriculas: String) -> Self {
        Self {
            id,
            id_registro_notas,
            id_matriculas,
            nota1: 0.0,
            nota2: 0.0,
            sup: 0,
            version: 1,
            nombre_estudiante: None,
            nombre_profesor: None,
            nombre_asignatura: None,
            ciclo: None,
        }
    }
}
