use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Asignatura {
    #[serde(rename = "id_")]
    #[sqlx(rename = "id_")]
    pub id: String,
    pub id_asignaturas: String,
    pub nombre_asignatura: String,
    pub version: i32,
}
