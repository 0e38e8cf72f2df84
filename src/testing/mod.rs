//! Test doubles and seed data shared by unit and integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::notifier::{ChangeNotifier, NotifyError};
use crate::types::Operation;

/// One event captured by `RecordingNotifier`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub operation: Operation,
    pub table: String,
    pub data: Value,
}

/// Notifier that keeps every event in memory instead of posting it.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<RecordedEvent>>,
    rejecting: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every event, then reports it as rejected by the middleware.
    pub fn failing() -> Self {
        Self {
            rejecting: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events for one table, in delivery order.
    pub fn events_for(&self, table: &str) -> Vec<RecordedEvent> {
        self.events().into_iter().filter(|e| e.table == table).collect()
    }

    fn outcome(&self, endpoint: &str) -> Result<(), NotifyError> {
        if self.rejecting {
            return Err(NotifyError::Status {
                url: format!("memory://{}", endpoint),
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChangeNotifier for RecordingNotifier {
    async fn notify(&self, operation: Operation, table: &str, data: &Value) -> Result<(), NotifyError> {
        if let Ok(mut events) = self.events.lock() {
            events.push(RecordedEvent {
                operation,
                table: table.to_string(),
                data: data.clone(),
            });
        }
        self.outcome("sync")
    }

    async fn notify_online(&self) -> Result<(), NotifyError> {
        self.outcome("notify-online")
    }
}

pub mod fixtures {
    use crate::database::models::{Asignacion, Asignatura, Ciclo, Estudiante, Profesor};
    use crate::database::MemoryStore;

    /// Business ids of the seeded catalog rows.
    #[derive(Debug, Clone)]
    pub struct Catalog {
        pub profesor: String,
        pub asignatura: String,
        pub ciclo: String,
        pub asignacion: String,
        /// A second assignment of the same professor, for re-pointing enrollments.
        pub otra_asignacion: String,
    }

    pub fn estudiante(id_estudiantes: &str, nombre: &str) -> Estudiante {
        Estudiante {
            id: format!("row-{}", id_estudiantes),
            id_estudiantes: id_estudiantes.to_string(),
            nombre: nombre.to_string(),
            version: 1,
        }
    }

    pub fn asignacion(id: &str, id_profesores: &str, id_asignaturas: &str, id_ciclos: &str) -> Asignacion {
        Asignacion {
            id: format!("row-{}", id),
            id_profesores_ciclos_asignaturas: id.to_string(),
            id_profesores: id_profesores.to_string(),
            id_asignaturas: id_asignaturas.to_string(),
            id_ciclos: id_ciclos.to_string(),
            version: 1,
            nombre_profesor: None,
            nombre_asignatura: None,
            ciclo: None,
        }
    }

    /// One professor, two subjects, one cycle and an assignment per subject.
    pub fn seed_catalog(store: &MemoryStore) -> Catalog {
        store.seed_profesor(Profesor {
            id: "row-prof-1".into(),
            id_profesores: "prof-1".into(),
            nombre: "Carlos Ruiz".into(),
            version: 1,
        });
        store.seed_asignatura(Asignatura {
            id: "row-asig-1".into(),
            id_asignaturas: "asig-1".into(),
            nombre_asignatura: "Matemáticas".into(),
            version: 1,
        });
        store.seed_asignatura(Asignatura {
            id: "row-asig-2".into(),
            id_asignaturas: "asig-2".into(),
            nombre_asignatura: "Física".into(),
            version: 1,
        });
        store.seed_ciclo(Ciclo {
            id: "row-ciclo-1".into(),
            id_ciclos: "ciclo-1".into(),
            ciclo: "2024-1".into(),
            version: 1,
        });
        store.seed_asignacion(asignacion("pca-1", "prof-1", "asig-1", "ciclo-1"));
        store.seed_asignacion(asignacion("pca-2", "prof-1", "asig-2", "ciclo-1"));

        Catalog {
            profesor: "prof-1".into(),
            asignatura: "asig-1".into(),
            ciclo: "ciclo-1".into(),
            asignacion: "pca-1".into(),
            otra_asignacion: "pca-2".into(),
        }
    }
}
