pub mod asignacion;
pub mod asignatura;
pub mod ciclo;
pub mod estudiante;
pub mod matricula;
pub mod nota;
pub mod profesor;

pub use asignacion::{Asignacion, AsignaturaDisponible};
pub use asignatura::Asignatura;
pub use ciclo::Ciclo;
pub use estudiante::Estudiante;
pub use matricula::Matricula;
pub use nota::RegistroNotas;
pub use profesor::Profesor;
