use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    Asignacion, Asignatura, AsignaturaDisponible, Ciclo, Estudiante, Matricula, Profesor, RegistroNotas,
};

/// Errors from the persistence gateway
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("row decode failed: {0}")]
    Decode(String),

    #[error("database unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_decode(&self) -> bool {
        matches!(self, StoreError::Decode(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => StoreError::Decode(err.to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One method per statement the handlers issue. Every call commits on its
/// own; nothing here spans a transaction.
///
/// `find_*` return `Ok(None)` when no row matches. Listings return rows in
/// whatever order storage yields them.
#[async_trait]
pub trait Store: Send + Sync {
    // estudiantes
    async fn list_estudiantes(&self) -> StoreResult<Vec<Estudiante>>;
    async fn find_estudiante(&self, id_estudiantes: &str) -> StoreResult<Option<Estudiante>>;
    async fn insert_estudiante(&self, estudiante: &Estudiante) -> StoreResult<()>;
    async fn update_estudiante(&self, id_estudiantes: &str, nombre: &str, version: i32) -> StoreResult<()>;
    async fn delete_estudiante(&self, id_estudiantes: &str) -> StoreResult<()>;
    async fn count_matriculas_by_estudiante(&self, id_estudiantes: &str) -> StoreResult<i64>;

    // read-only catalogs
    async fn list_asignaturas(&self) -> StoreResult<Vec<Asignatura>>;
    async fn find_asignatura(&self, id_asignaturas: &str) -> StoreResult<Option<Asignatura>>;
    async fn list_profesores(&self) -> StoreResult<Vec<Profesor>>;
    async fn find_profesor(&self, id_profesores: &str) -> StoreResult<Option<Profesor>>;
    async fn list_ciclos(&self) -> StoreResult<Vec<Ciclo>>;
    async fn find_ciclo(&self, id_ciclos: &str) -> StoreResult<Option<Ciclo>>;

    // profesores_ciclos_asignaturas
    async fn list_asignaciones(&self) -> StoreResult<Vec<Asignacion>>;
    async fn find_asignacion(&self, id: &str) -> StoreResult<Option<Asignacion>>;
    /// Plain row lookup without join projections, used for existence checks.
    async fn find_asignacion_row(&self, id: &str) -> StoreResult<Option<Asignacion>>;
    async fn list_asignaturas_disponibles(&self) -> StoreResult<Vec<AsignaturaDisponible>>;

    // matriculas
    async fn list_matriculas(&self) -> StoreResult<Vec<Matricula>>;
    async fn find_matricula(&self, id_matriculas: &str) -> StoreResult<Option<Matricula>>;
    /// Plain row lookup without join projections.
    async fn find_matricula_row(&self, id_matriculas: &str) -> StoreResult<Option<Matricula>>;
    /// Enrollments for the (student, assignment) pair, optionally ignoring one enrollment id.
    async fn count_matriculas_for_pair(
        &self,
        id_estudiantes: &str,
        id_asignacion: &str,
        excluding: Option<&str>,
    ) -> StoreResult<i64>;
    async fn insert_matricula(&self, matricula: &Matricula) -> StoreResult<()>;
    async fn update_matricula(
        &self,
        id_matriculas: &str,
        id_estudiantes: &str,
        id_asignacion: &str,
        version: i32,
    ) -> StoreResult<()>;
    async fn delete_matricula(&self, id_matriculas: &str) -> StoreResult<()>;

    // registro_notas
    async fn list_notas(&self) -> StoreResult<Vec<RegistroNotas>>;
    async fn find_nota(&self, id_registro_notas: &str) -> StoreResult<Option<RegistroNotas>>;
    async fn list_notas_by_estudiante(&self, id_estudiantes: &str) -> StoreResult<Vec<RegistroNotas>>;
    async fn find_nota_by_matricula(&self, id_matriculas: &str) -> StoreResult<Option<RegistroNotas>>;
    async fn insert_nota(&self, nota: &RegistroNotas) -> StoreResult<()>;
    async fn delete_notas_by_matricula(&self, id_matriculas: &str) -> StoreResult<()>;
}
