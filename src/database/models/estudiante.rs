use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Estudiante {
    #[serde(rename = "id_")]
    #[sqlx(rename = "id_")]
    pub id: String,
    pub id_estudiantes: String,
    pub nombre: String,
    pub version: i32,
}
