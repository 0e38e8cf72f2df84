//! Enrollment creation: three existence checks, then two dependent inserts.
//!
//! The inserts are separate statements, not a transaction. If the grade record
//! cannot be written, the enrollment row is deleted again, and the outcome
//! records whether that compensation itself succeeded.

use thiserror::Error;
use tracing::error;

use crate::database::models::{Matricula, RegistroNotas};
use crate::database::{Store, StoreError};
use crate::ids::{self, IdError};

/// Failures before anything was written.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("student {0} does not exist")]
    EstudianteNotFound(String),

    #[error("assignment {0} does not exist")]
    AsignacionNotFound(String),

    #[error("student {id_estudiantes} already enrolled in {id_asignacion}")]
    AlreadyEnrolled {
        id_estudiantes: String,
        id_asignacion: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Id(#[from] IdError),
}

/// Result of the insert phase.
#[derive(Debug)]
pub enum EnrollmentOutcome {
    /// Both rows are stored.
    Committed { matricula: Matricula, nota: RegistroNotas },

    /// The grade insert failed and the enrollment row was removed again.
    RolledBackOk { cause: StoreError },

    /// The grade insert failed and so did the cleanup: an enrollment
    /// without grade record remains under `id_matriculas`.
    RolledBackFailed {
        id_matriculas: String,
        cause: StoreError,
        rollback: StoreError,
    },
}

/// Validate references, then insert the enrollment with its blank grade record.
///
/// All four identifiers are drawn before the first insert, so an entropy
/// failure never leaves a half-written pair behind.
pub async fn create(
    store: &dyn Store,
    id_estudiantes: &str,
    id_asignacion: &str,
) -> Result<EnrollmentOutcome, EnrollmentError> {
    if store.find_estudiante(id_estudiantes).await?.is_none() {
        return Err(EnrollmentError::EstudianteNotFound(id_estudiantes.to_string()));
    }

    if store.find_asignacion_row(id_asignacion).await?.is_none() {
        return Err(EnrollmentError::AsignacionNotFound(id_asignacion.to_string()));
    }

    if store.count_matriculas_for_pair(id_estudiantes, id_asignacion, None).await? > 0 {
        return Err(EnrollmentError::AlreadyEnrolled {
            id_estudiantes: id_estudiantes.to_string(),
            id_asignacion: id_asignacion.to_string(),
        });
    }

    let matricula = Matricula::new(
        ids::generate()?,
        ids::generate()?,
        id_estudiantes.to_string(),
        id_asignacion.to_string(),
        1,
    );
    let nota = RegistroNotas::blank(ids::generate()?, ids::generate()?, matricula.id_matriculas.clone());

    insert_pair(store, matricula, nota).await
}

/// Phase one writes the enrollment; phase two writes its grade record and
/// compensates on failure. Only a failure of phase one is an `Err`.
pub async fn insert_pair(
    store: &dyn Store,
    matricula: Matricula,
    nota: RegistroNotas,
) -> Result<EnrollmentOutcome, EnrollmentError> {
    store.insert_matricula(&matricula).await?;

    let cause = match store.insert_nota(&nota).await {
        Ok(()) => return Ok(EnrollmentOutcome::Committed { matricula, nota }),
        Err(cause) => cause,
    };

    match store.delete_matricula(&matricula.id_matriculas).await {
        Ok(()) => Ok(EnrollmentOutcome::RolledBackOk { cause }),
        Err(rollback) => {
            error!(
                "Enrollment {} left without grade record: insert failed ({}), cleanup failed ({})",
                matricula.id_matriculas, cause, rollback
            );
            Ok(EnrollmentOutcome::RolledBackFailed {
                id_matriculas: matricula.id_matriculas,
                cause,
                rollback,
            })
        }
    }
}
