use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Status {
    pub status: &'static str,
    pub server: &'static str,
}

/// GET /status - liveness check, never touches the database
pub async fn get() -> Json<Status> {
    Json(Status {
        status: "online",
        server: "estudiantes",
    })
}
