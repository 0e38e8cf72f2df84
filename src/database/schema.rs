//! Idempotent DDL for the seven tables, applied by the `migrate` subcommand.

use sqlx::MySqlPool;
use tracing::info;

use super::manager::DatabaseError;

/// Tables in dependency order; parents come before the rows that reference them.
const TABLES: &[(&str, &str)] = &[
    (
        "estudiantes",
        "CREATE TABLE IF NOT EXISTS estudiantes (
            id_ VARCHAR(20) NOT NULL PRIMARY KEY,
            id_estudiantes VARCHAR(20) NOT NULL UNIQUE,
            nombre VARCHAR(255) NOT NULL,
            version INT NOT NULL DEFAULT 1
        ) DEFAULT CHARSET = utf8mb4",
    ),
    (
        "asignaturas",
        "CREATE TABLE IF NOT EXISTS asignaturas (
            id_ VARCHAR(20) NOT NULL PRIMARY KEY,
            id_asignaturas VARCHAR(20) NOT NULL UNIQUE,
            nombre_asignatura VARCHAR(255) NOT NULL,
            version INT NOT NULL DEFAULT 1
        ) DEFAULT CHARSET = utf8mb4",
    ),
    (
        "profesores",
        "CREATE TABLE IF NOT EXISTS profesores (
            id_ VARCHAR(20) NOT NULL PRIMARY KEY,
            id_profesores VARCHAR(20) NOT NULL UNIQUE,
            nombre VARCHAR(255) NOT NULL,
            version INT NOT NULL DEFAULT 1
        ) DEFAULT CHARSET = utf8mb4",
    ),
    (
        "ciclos",
        "CREATE TABLE IF NOT EXISTS ciclos (
            id_ VARCHAR(20) NOT NULL PRIMARY KEY,
            id_ciclos VARCHAR(20) NOT NULL UNIQUE,
            ciclo VARCHAR(255) NOT NULL,
            version INT NOT NULL DEFAULT 1
        ) DEFAULT CHARSET = utf8mb4",
    ),
    (
        "profesores_ciclos_asignaturas",
        "CREATE TABLE IF NOT EXISTS profesores_ciclos_asignaturas (
            id_ VARCHAR(20) NOT NULL PRIMARY KEY,
            id_profesores_ciclos_asignaturas VARCHAR(20) NOT NULL UNIQUE,
            id_profesores VARCHAR(20) NOT NULL,
            id_asignaturas VARCHAR(20) NOT NULL,
            id_ciclos VARCHAR(20) NOT NULL,
            version INT NOT NULL DEFAULT 1,
            FOREIGN KEY (id_profesores) REFERENCES profesores (id_profesores),
            FOREIGN KEY (id_asignaturas) REFERENCES asignaturas (id_asignaturas),
            FOREIGN KEY (id_ciclos) REFERENCES ciclos (id_ciclos)
        ) DEFAULT CHARSET = utf8mb4",
    ),
    (
        "matriculas",
        "CREATE TABLE IF NOT EXISTS matriculas (
            id_ VARCHAR(20) NOT NULL PRIMARY KEY,
            id_matriculas VARCHAR(20) NOT NULL UNIQUE,
            id_estudiantes VARCHAR(20) NOT NULL,
            id_profesores_ciclos_asignaturas VARCHAR(20) NOT NULL,
            version INT NOT NULL DEFAULT 1,
            FOREIGN KEY (id_estudiantes) REFERENCES estudiantes (id_estudiantes),
            FOREIGN KEY (id_profesores_ciclos_asignaturas)
                REFERENCES profesores_ciclos_asignaturas (id_profesores_ciclos_asignaturas)
        ) DEFAULT CHARSET = utf8mb4",
    ),
    (
        "registro_notas",
        "CREATE TABLE IF NOT EXISTS registro_notas (
            id_ VARCHAR(20) NOT NULL PRIMARY KEY,
            id_registro_notas VARCHAR(20) NOT NULL UNIQUE,
            id_matriculas VARCHAR(20) NOT NULL,
            nota1 DOUBLE NOT NULL DEFAULT 0,
            nota2 DOUBLE NOT NULL DEFAULT 0,
            sup INT NOT NULL DEFAULT 0,
            version INT NOT NULL DEFAULT 1,
            FOREIGN KEY (id_matriculas) REFERENCES matriculas (id_matriculas)
        ) DEFAULT CHARSET = utf8mb4",
    ),
];

/// Create any missing table. Existing tables are left untouched.
pub async fn apply(pool: &MySqlPool) -> Result<(), DatabaseError> {
    for (name, ddl) in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(DatabaseError::Migration)?;
        info!("Table {} ready", name);
    }
    Ok(())
}
