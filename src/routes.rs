use std::path::Path;

use axum::{middleware, routing::get, Router};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::handlers::{asignaciones, asignaturas, ciclos, estudiantes, matriculas, notas, profesores, status};
use crate::middleware::cors_middleware;
use crate::state::AppState;

/// The full application: resource routes at `/` and under `/api`, static
/// files for everything else, request tracing and CORS around it all.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let resources = resource_routes();

    Router::new()
        .merge(resources.clone())
        .nest("/api", resources)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        // Outermost, so preflights are answered before tracing or routing.
        .layer(middleware::from_fn(cors_middleware))
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::get))
        // Students: the only catalog with full CRUD
        .route("/estudiantes", get(estudiantes::list).post(estudiantes::create))
        .route(
            "/estudiantes/:id",
            get(estudiantes::get)
                .put(estudiantes::update)
                .delete(estudiantes::delete),
        )
        // Read-only catalogs
        .route("/asignaturas", get(asignaturas::list))
        .route("/asignaturas/:id", get(asignaturas::get))
        .route("/profesores", get(profesores::list))
        .route("/profesores/:id", get(profesores::get))
        .route("/ciclos", get(ciclos::list))
        .route("/ciclos/:id", get(ciclos::get))
        .route("/asignaciones", get(asignaciones::list))
        .route("/asignaciones/:id", get(asignaciones::get))
        .route("/asignaturas-disponibles", get(asignaciones::disponibles))
        // Enrollments and their grade records
        .route("/matriculas", get(matriculas::list).post(matriculas::create))
        .route(
            "/matriculas/:id",
            get(matriculas::get)
                .put(matriculas::update)
                .delete(matriculas::delete),
        )
        .route("/notas", get(notas::list))
        .route("/notas/:id", get(notas::get))
        .route("/notas-estudiante/:id", get(notas::by_estudiante))
}
