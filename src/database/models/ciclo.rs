use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Academic term; `ciclo` is its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Ciclo {
    #[serde(rename = "id_")]
    #[sqlx(rename = "id_")]
    pub id: String,
    pub id_ciclos: String,
    pub ciclo: String,
    pub version: i32,
}
