//! In-process `Store` with the same observable semantics as the MySQL one:
//! insertion-ordered listings, left-join projections, one statement per call.
//! Faults can be armed to make a single upcoming statement fail.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::database::models::{
    Asignacion, Asignatura, AsignaturaDisponible, Ciclo, Estudiante, Matricula, Profesor, RegistroNotas,
};
use crate::database::store::{Store, StoreError, StoreResult};

/// Statements that can be made to fail once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    InsertNota,
    DeleteMatricula,
    ListEstudiantes,
    FindEstudiante,
}

#[derive(Default)]
struct Tables {
    estudiantes: Vec<Estudiante>,
    asignaturas: Vec<Asignatura>,
    profesores: Vec<Profesor>,
    ciclos: Vec<Ciclo>,
    asignaciones: Vec<Asignacion>,
    matriculas: Vec<Matricula>,
    notas: Vec<RegistroNotas>,
    faults: Vec<Fault>,
}

impl Tables {
    fn take_fault(&mut self, fault: Fault) -> StoreResult<()> {
        if let Some(pos) = self.faults.iter().position(|f| *f == fault) {
            self.faults.remove(pos);
            return Err(StoreError::Query(format!("injected fault: {:?}", fault)));
        }
        Ok(())
    }

    fn project_asignacion(&self, row: &Asignacion) -> Asignacion {
        let mut out = row.clone();
        out.nombre_profesor = self
            .profesores
            .iter()
            .find(|p| p.id_profesores == row.id_profesores)
            .map(|p| p.nombre.clone());
        out.nombre_asignatura = self
            .asignaturas
            .iter()
            .find(|a| a.id_asignaturas == row.id_asignaturas)
            .map(|a| a.nombre_asignatura.clone());
        out.ciclo = self
            .ciclos
            .iter()
            .find(|c| c.id_ciclos == row.id_ciclos)
            .map(|c| c.ciclo.clone());
        out
    }

    fn project_matricula(&self, row: &Matricula) -> Matricula {
        let mut out = row.clone();
        out.nombre_estudiante = self
            .estudiantes
            .iter()
            .find(|e| e.id_estudiantes == row.id_estudiantes)
            .map(|e| e.nombre.clone());
        let asignacion = self
            .asignaciones
            .iter()
            .find(|a| a.id_profesores_ciclos_asignaturas == row.id_profesores_ciclos_asignaturas)
            .map(|a| self.project_asignacion(a));
        if let Some(a) = asignacion {
            out.nombre_profesor = a.nombre_profesor;
            out.nombre_asignatura = a.nombre_asignatura;
            out.ciclo = a.ciclo;
        }
        out
    }

    fn project_nota(&self, row: &RegistroNotas) -> RegistroNotas {
        let mut out = row.clone();
        if let Some(m) = self.matriculas.iter().find(|m| m.id_matriculas == row.id_matriculas) {
            let m = self.project_matricula(m);
            out.nombre_estudiante = m.nombre_estudiante;
            out.nombre_profesor = m.nombre_profesor;
            out.nombre_asignatura = m.nombre_asignatura;
            out.ciclo = m.ciclo;
        }
        out
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Arm a one-shot failure for the next matching statement.
    pub fn inject_fault(&self, fault: Fault) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.faults.push(fault);
        }
    }

    // Catalog rows have no write endpoint; these seed them directly.

    pub fn seed_estudiante(&self, row: Estudiante) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.estudiantes.push(row);
        }
    }

    pub fn seed_asignatura(&self, row: Asignatura) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.asignaturas.push(row);
        }
    }

    pub fn seed_profesor(&self, row: Profesor) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.profesores.push(row);
        }
    }

    pub fn seed_ciclo(&self, row: Ciclo) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.ciclos.push(row);
        }
    }

    pub fn seed_asignacion(&self, row: Asignacion) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.asignaciones.push(row);
        }
    }

    pub fn matricula_count(&self) -> usize {
        self.tables.lock().map(|t| t.matriculas.len()).unwrap_or(0)
    }

    pub fn nota_count(&self) -> usize {
        self.tables.lock().map(|t| t.notas.len()).unwrap_or(0)
    }

    pub fn estudiante_count(&self) -> usize {
        self.tables.lock().map(|t| t.estudiantes.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_estudiantes(&self) -> StoreResult<Vec<Estudiante>> {
        let mut t = self.lock()?;
        t.take_fault(Fault::ListEstudiantes)?;
        Ok(t.estudiantes.clone())
    }

    async fn find_estudiante(&self, id_estudiantes: &str) -> StoreResult<Option<Estudiante>> {
        let mut t = self.lock()?;
        t.take_fault(Fault::FindEstudiante)?;
        Ok(t.estudiantes.iter().find(|e| e.id_estudiantes == id_estudiantes).cloned())
    }

    async fn insert_estudiante(&self, estudiante: &Estudiante) -> StoreResult<()> {
        self.lock()?.estudiantes.push(estudiante.clone());
        Ok(())
    }

    async fn update_estudiante(&self, id_estudiantes: &str, nombre: &str, version: i32) -> StoreResult<()> {
        let mut t = self.lock()?;
        for e in t.estudiantes.iter_mut().filter(|e| e.id_estudiantes == id_estudiantes) {
            e.nombre = nombre.to_string();
            e.version = version;
        }
        Ok(())
    }

    async fn delete_estudiante(&self, id_estudiantes: &str) -> StoreResult<()> {
        self.lock()?.estudiantes.retain(|e| e.id_estudiantes != id_estudiantes);
        Ok(())
    }

    async fn count_matriculas_by_estudiante(&self, id_estudiantes: &str) -> StoreResult<i64> {
        let t = self.lock()?;
        Ok(t.matriculas.iter().filter(|m| m.id_estudiantes == id_estudiantes).count() as i64)
    }

    async fn list_asignaturas(&self) -> StoreResult<Vec<Asignatura>> {
        Ok(self.lock()?.asignaturas.clone())
    }

    async fn find_asignatura(&self, id_asignaturas: &str) -> StoreResult<Option<Asignatura>> {
        let t = self.lock()?;
        Ok(t.asignaturas.iter().find(|a| a.id_asignaturas == id_asignaturas).cloned())
    }

    async fn list_profesores(&self) -> StoreResult<Vec<Profesor>> {
        Ok(self.lock()?.profesores.clone())
    }

    async fn find_profesor(&self, id_profesores: &str) -> StoreResult<Option<Profesor>> {
        let t = self.lock()?;
        Ok(t.profesores.iter().find(|p| p.id_profesores == id_profesores).cloned())
    }

    async fn list_ciclos(&self) -> StoreResult<Vec<Ciclo>> {
        Ok(self.lock()?.ciclos.clone())
    }

    async fn find_ciclo(&self, id_ciclos: &str) -> StoreResult<Option<Ciclo>> {
        let t = self.lock()?;
        Ok(t.ciclos.iter().find(|c| c.id_ciclos == id_ciclos).cloned())
    }

    async fn list_asignaciones(&self) -> StoreResult<Vec<Asignacion>> {
        let t = self.lock()?;
        Ok(t.asignaciones.iter().map(|a| t.project_asignacion(a)).collect())
    }

    async fn find_asignacion(&self, id: &str) -> StoreResult<Option<Asignacion>> {
        let t = self.lock()?;
        Ok(t
            .asignaciones
            .iter()
            .find(|a| a.id_profesores_ciclos_asignaturas == id)
            .map(|a| t.project_asignacion(a)))
    }

    async fn find_asignacion_row(&self, id: &str) -> StoreResult<Option<Asignacion>> {
        let t = self.lock()?;
        Ok(t.asignaciones.iter().find(|a| a.id_profesores_ciclos_asignaturas == id).cloned())
    }

    async fn list_asignaturas_disponibles(&self) -> StoreResult<Vec<AsignaturaDisponible>> {
        let t = self.lock()?;
        // Inner join: assignments missing any referenced row are not offered.
        Ok(t.asignaciones
            .iter()
            .map(|a| t.project_asignacion(a))
            .filter_map(|a| {
                Some(AsignaturaDisponible {
                    id: a.id_profesores_ciclos_asignaturas,
                    profesor: a.nombre_profesor?,
                    asignatura: a.nombre_asignatura?,
                    ciclo: a.ciclo?,
                })
            })
            .collect())
    }

    async fn list_matriculas(&self) -> StoreResult<Vec<Matricula>> {
        let t = self.lock()?;
        Ok(t.matriculas.iter().map(|m| t.project_matricula(m)).collect())
    }

    async fn find_matricula(&self, id_matriculas: &str) -> StoreResult<Option<Matricula>> {
        let t = self.lock()?;
        Ok(t
            .matriculas
            .iter()
            .find(|m| m.id_matriculas == id_matriculas)
            .map(|m| t.project_matricula(m)))
    }

    async fn find_matricula_row(&self, id_matriculas: &str) -> StoreResult<Option<Matricula>> {
        let t = self.lock()?;
        Ok(t.matriculas.iter().find(|m| m.id_matriculas == id_matriculas).cloned())
    }

    async fn count_matriculas_for_pair(
        &self,
        id_estudiantes: &str,
        id_asignacion: &str,
        excluding: Option<&str>,
    ) -> StoreResult<i64> {
        let t = self.lock()?;
        Ok(t.matriculas
            .iter()
            .filter(|m| m.id_estudiantes == id_estudiantes && m.id_profesores_ciclos_asignaturas == id_asignacion)
            .filter(|m| excluding.map_or(true, |id| m.id_matriculas != id))
            .count() as i64)
    }

    async fn insert_matricula(&self, matricula: &Matricula) -> StoreResult<()> {
        self.lock()?.matriculas.push(matricula.clone());
        Ok(())
    }

    async fn update_matricula(
        &self,
        id_matriculas: &str,
        id_estudiantes: &str,
        id_asignacion: &str,
        version: i32,
    ) -> StoreResult<()> {
        let mut t = self.lock()?;
        for m in t.matriculas.iter_mut().filter(|m| m.id_matriculas == id_matriculas) {
            m.id_estudiantes = id_estudiantes.to_string();
            m.id_profesores_ciclos_asignaturas = id_asignacion.to_string();
            m.version = version;
        }
        Ok(())
    }

    async fn delete_matricula(&self, id_matriculas: &str) -> StoreResult<()> {
        let mut t = self.lock()?;
        t.take_fault(Fault::DeleteMatricula)?;
        t.matriculas.retain(|m| m.id_matriculas != id_matriculas);
        Ok(())
    }

    async fn list_notas(&self) -> StoreResult<Vec<RegistroNotas>> {
        let t = self.lock()?;
        Ok(t.notas.iter().map(|n| t.project_nota(n)).collect())
    }

    async fn find_nota(&self, id_registro_notas: &str) -> StoreResult<Option<RegistroNotas>> {
        let t = self.lock()?;
        Ok(t
            .notas
            .iter()
            .find(|n| n.id_registro_notas == id_registro_notas)
            .map(|n| t.project_nota(n)))
    }

    async fn list_notas_by_estudiante(&self, id_estudiantes: &str) -> StoreResult<Vec<RegistroNotas>> {
        let t = self.lock()?;
        Ok(t.notas
            .iter()
            .filter(|n| {
                t.matriculas
                    .iter()
                    .any(|m| m.id_matriculas == n.id_matriculas && m.id_estudiantes == id_estudiantes)
            })
            .map(|n| t.project_nota(n))
            .collect())
    }

    async fn find_nota_by_matricula(&self, id_matriculas: &str) -> StoreResult<Option<RegistroNotas>> {
        let t = self.lock()?;
        Ok(t.notas.iter().find(|n| n.id_matriculas == id_matriculas).cloned())
    }

    async fn insert_nota(&self, nota: &RegistroNotas) -> StoreResult<()> {
        let mut t = self.lock()?;
        t.take_fault(Fault::InsertNota)?;
        t.notas.push(nota.clone());
        Ok(())
    }

    async fn delete_notas_by_matricula(&self, id_matriculas: &str) -> StoreResult<()> {
        self.lock()?.notas.retain(|n| n.id_matriculas != id_matriculas);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn joined_reads_fill_projections() {
        let store = MemoryStore::new();
        let catalog = fixtures::seed_catalog(&store);
        let ana = fixtures::estudiante("est-ana", "Ana");
        store.seed_estudiante(ana.clone());

        let m = Matricula::new(
            "row-1".into(),
            "mat-1".into(),
            ana.id_estudiantes.clone(),
            catalog.asignacion.clone(),
            1,
        );
        store.insert_matricula(&m).await.unwrap();

        let joined = store.find_matricula("mat-1").await.unwrap().unwrap();
        assert_eq!(joined.nombre_estudiante.as_deref(), Some("Ana"));
        assert_eq!(joined.nombre_profesor.as_deref(), Some("Carlos Ruiz"));
        assert_eq!(joined.nombre_asignatura.as_deref(), Some("Matemáticas"));
        assert_eq!(joined.ciclo.as_deref(), Some("2024-1"));

        let plain = store.find_matricula_row("mat-1").await.unwrap().unwrap();
        assert_eq!(plain.nombre_estudiante, None);
    }

    #[tokio::test]
    async fn left_join_leaves_missing_projection_empty() {
        let store = MemoryStore::new();
        store.seed_asignacion(fixtures::asignacion("pca-x", "prof-missing", "asig-missing", "ciclo-missing"));

        let listed = store.list_asignaciones().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].nombre_profesor, None);

        // The available-subjects listing is an inner join.
        assert!(store.list_asignaturas_disponibles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pair_count_honours_exclusion() {
        let store = MemoryStore::new();
        let m = Matricula::new("r".into(), "mat-1".into(), "est".into(), "pca".into(), 1);
        store.insert_matricula(&m).await.unwrap();

        assert_eq!(store.count_matriculas_for_pair("est", "pca", None).await.unwrap(), 1);
        assert_eq!(store.count_matriculas_for_pair("est", "pca", Some("mat-1")).await.unwrap(), 0);
        assert_eq!(store.count_matriculas_for_pair("est", "other", None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn faults_fire_once() {
        let store = MemoryStore::new();
        store.inject_fault(Fault::InsertNota);
        let nota = RegistroNotas::blank("r".into(), "n".into(), "m".into());

        assert!(store.insert_nota(&nota).await.is_err());
        assert!(store.insert_nota(&nota).await.is_ok());
        assert_eq!(store.nota_count(), 1);
    }
}
