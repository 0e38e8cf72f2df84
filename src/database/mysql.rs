use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::database::models::{
    Asignacion, Asignatura, AsignaturaDisponible, Ciclo, Estudiante, Matricula, Profesor, RegistroNotas,
};
use crate::database::store::{Store, StoreResult};

const ASIGNACION_JOINED: &str = r#"
    SELECT
        pca.id_,
        pca.id_profesores_ciclos_asignaturas,
        pca.id_profesores,
        pca.id_asignaturas,
        pca.id_ciclos,
        pca.version,
        p.nombre AS nombre_profesor,
        a.nombre_asignatura,
        c.ciclo
    FROM profesores_ciclos_asignaturas pca
    LEFT JOIN profesores p ON pca.id_profesores = p.id_profesores
    LEFT JOIN asignaturas a ON pca.id_asignaturas = a.id_asignaturas
    LEFT JOIN ciclos c ON pca.id_ciclos = c.id_ciclos
"#;

const MATRICULA_JOINED: &str = r#"
    SELECT
        m.id_,
        m.id_matriculas,
        m.id_estudiantes,
        m.id_profesores_ciclos_asignaturas,
        m.version,
        e.nombre AS nombre_estudiante,
        p.nombre AS nombre_profesor,
        a.nombre_asignatura,
        c.ciclo
    FROM matriculas m
    LEFT JOIN estudiantes e ON m.id_estudiantes = e.id_estudiantes
    LEFT JOIN profesores_ciclos_asignaturas pca ON m.id_profesores_ciclos_asignaturas = pca.id_profesores_ciclos_asignaturas
    LEFT JOIN profesores p ON pca.id_profesores = p.id_profesores
    LEFT JOIN asignaturas a ON pca.id_asignaturas = a.id_asignaturas
    LEFT JOIN ciclos c ON pca.id_ciclos = c.id_ciclos
"#;

const NOTA_JOINED: &str = r#"
    SELECT
        rn.id_,
        rn.id_registro_notas,
        rn.id_matriculas,
        rn.nota1,
        rn.nota2,
        rn.sup,
        rn.version,
        e.nombre AS nombre_estudiante,
        p.nombre AS nombre_profesor,
        a.nombre_asignatura,
        c.ciclo
    FROM registro_notas rn
    LEFT JOIN matriculas m ON rn.id_matriculas = m.id_matriculas
    LEFT JOIN estudiantes e ON m.id_estudiantes = e.id_estudiantes
    LEFT JOIN profesores_ciclos_asignaturas pca ON m.id_profesores_ciclos_asignaturas = pca.id_profesores_ciclos_asignaturas
    LEFT JOIN profesores p ON pca.id_profesores = p.id_profesores
    LEFT JOIN asignaturas a ON pca.id_asignaturas = a.id_asignaturas
    LEFT JOIN ciclos c ON pca.id_ciclos = c.id_ciclos
"#;

/// `Store` over a MySQL connection pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn list_estudiantes(&self) -> StoreResult<Vec<Estudiante>> {
        let rows = sqlx::query_as::<_, Estudiante>("SELECT id_, id_estudiantes, nombre, version FROM estudiantes")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_estudiante(&self, id_estudiantes: &str) -> StoreResult<Option<Estudiante>> {
        let row = sqlx::query_as::<_, Estudiante>(
            "SELECT id_, id_estudiantes, nombre, version FROM estudiantes WHERE id_estudiantes = ?",
        )
        .bind(id_estudiantes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_estudiante(&self, estudiante: &Estudiante) -> StoreResult<()> {
        sqlx::query("INSERT INTO estudiantes (id_, id_estudiantes, nombre, version) VALUES (?, ?, ?, ?)")
            .bind(&estudiante.id)
            .bind(&estudiante.id_estudiantes)
            .bind(&estudiante.nombre)
            .bind(estudiante.version)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_estudiante(&self, id_estudiantes: &str, nombre: &str, version: i32) -> StoreResult<()> {
        sqlx::query("UPDATE estudiantes SET nombre = ?, version = ? WHERE id_estudiantes = ?")
            .bind(nombre)
            .bind(version)
            .bind(id_estudiantes)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_estudiante(&self, id_estudiantes: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM estudiantes WHERE id_estudiantes = ?")
            .bind(id_estudiantes)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_matriculas_by_estudiante(&self, id_estudiantes: &str) -> StoreResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM matriculas WHERE id_estudiantes = ?")
            .bind(id_estudiantes)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn list_asignaturas(&self) -> StoreResult<Vec<Asignatura>> {
        let rows = sqlx::query_as::<_, Asignatura>(
            "SELECT id_, id_asignaturas, nombre_asignatura, version FROM asignaturas",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_asignatura(&self, id_asignaturas: &str) -> StoreResult<Option<Asignatura>> {
        let row = sqlx::query_as::<_, Asignatura>(
            "SELECT id_, id_asignaturas, nombre_asignatura, version FROM asignaturas WHERE id_asignaturas = ?",
        )
        .bind(id_asignaturas)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_profesores(&self) -> StoreResult<Vec<Profesor>> {
        let rows = sqlx::query_as::<_, Profesor>("SELECT id_, id_profesores, nombre, version FROM profesores")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_profesor(&self, id_profesores: &str) -> StoreResult<Option<Profesor>> {
        let row = sqlx::query_as::<_, Profesor>(
            "SELECT id_, id_profesores, nombre, version FROM profesores WHERE id_profesores = ?",
        )
        .bind(id_profesores)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_ciclos(&self) -> StoreResult<Vec<Ciclo>> {
        let rows = sqlx::query_as::<_, Ciclo>("SELECT id_, id_ciclos, ciclo, version FROM ciclos")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_ciclo(&self, id_ciclos: &str) -> StoreResult<Option<Ciclo>> {
        let row = sqlx::query_as::<_, Ciclo>("SELECT id_, id_ciclos, ciclo, version FROM ciclos WHERE id_ciclos = ?")
            .bind(id_ciclos)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_asignaciones(&self) -> StoreResult<Vec<Asignacion>> {
        let rows = sqlx::query_as::<_, Asignacion>(ASIGNACION_JOINED)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_asignacion(&self, id: &str) -> StoreResult<Option<Asignacion>> {
        let sql = format!("{} WHERE pca.id_profesores_ciclos_asignaturas = ?", ASIGNACION_JOINED);
        let row = sqlx::query_as::<_, Asignacion>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_asignacion_row(&self, id: &str) -> StoreResult<Option<Asignacion>> {
        let row = sqlx::query_as::<_, Asignacion>(
            "SELECT id_, id_profesores_ciclos_asignaturas, id_profesores, id_asignaturas, id_ciclos, version \
             FROM profesores_ciclos_asignaturas WHERE id_profesores_ciclos_asignaturas = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_asignaturas_disponibles(&self) -> StoreResult<Vec<AsignaturaDisponible>> {
        let rows = sqlx::query_as::<_, AsignaturaDisponible>(
            r#"
            SELECT
                pca.id_profesores_ciclos_asignaturas AS id,
                p.nombre AS profesor,
                a.nombre_asignatura AS asignatura,
                c.ciclo AS ciclo
            FROM profesores_ciclos_asignaturas pca
            JOIN profesores p ON pca.id_profesores = p.id_profesores
            JOIN asignaturas a ON pca.id_asignaturas = a.id_asignaturas
            JOIN ciclos c ON pca.id_ciclos = c.id_ciclos
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_matriculas(&self) -> StoreResult<Vec<Matricula>> {
        let rows = sqlx::query_as::<_, Matricula>(MATRICULA_JOINED)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_matricula(&self, id_matriculas: &str) -> StoreResult<Option<Matricula>> {
        let sql = format!("{} WHERE m.id_matriculas = ?", MATRICULA_JOINED);
        let row = sqlx::query_as::<_, Matricula>(&sql)
            .bind(id_matriculas)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_matricula_row(&self, id_matriculas: &str) -> StoreResult<Option<Matricula>> {
        let row = sqlx::query_as::<_, Matricula>(
            "SELECT id_, id_matriculas, id_estudiantes, id_profesores_ciclos_asignaturas, version \
             FROM matriculas WHERE id_matriculas = ?",
        )
        .bind(id_matriculas)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn count_matriculas_for_pair(
        &self,
        id_estudiantes: &str,
        id_asignacion: &str,
        excluding: Option<&str>,
    ) -> StoreResult<i64> {
        let count: (i64,) = match excluding {
            Some(id_matriculas) => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM matriculas \
                     WHERE id_estudiantes = ? AND id_profesores_ciclos_asignaturas = ? AND id_matriculas != ?",
                )
                .bind(id_estudiantes)
                .bind(id_asignacion)
                .bind(id_matriculas)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM matriculas WHERE id_estudiantes = ? AND id_profesores_ciclos_asignaturas = ?",
                )
                .bind(id_estudiantes)
                .bind(id_asignacion)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(count.0)
    }

    async fn insert_matricula(&self, matricula: &Matricula) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO matriculas (id_, id_matriculas, id_estudiantes, id_profesores_ciclos_asignaturas, version) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&matricula.id)
        .bind(&matricula.id_matriculas)
        .bind(&matricula.id_estudiantes)
        .bind(&matricula.id_profesores_ciclos_asignaturas)
        .bind(matricula.version)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_matricula(
        &self,
        id_matriculas: &str,
        id_estudiantes: &str,
        id_asignacion: &str,
        version: i32,
    ) -> StoreResult<()> {
        sqlx::query(
            "UPDATE matriculas SET id_estudiantes = ?, id_profesores_ciclos_asignaturas = ?, version = ? \
             WHERE id_matriculas = ?",
        )
        .bind(id_estudiantes)
        .bind(id_asignacion)
        .bind(version)
        .bind(id_matriculas)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_matricula(&self, id_matriculas: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM matriculas WHERE id_matriculas = ?")
            .bind(id_matriculas)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_notas(&self) -> StoreResult<Vec<RegistroNotas>> {
        let rows = sqlx::query_as::<_, RegistroNotas>(NOTA_JOINED)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_nota(&self, id_registro_notas: &str) -> StoreResult<Option<RegistroNotas>> {
        let sql = format!("{} WHERE rn.id_registro_notas = ?", NOTA_JOINED);
        let row = sqlx::query_as::<_, RegistroNotas>(&sql)
            .bind(id_registro_notas)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_notas_by_estudiante(&self, id_estudiantes: &str) -> StoreResult<Vec<RegistroNotas>> {
        let sql = format!("{} WHERE m.id_estudiantes = ?", NOTA_JOINED);
        let rows = sqlx::query_as::<_, RegistroNotas>(&sql)
            .bind(id_estudiantes)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_nota_by_matricula(&self, id_matriculas: &str) -> StoreResult<Option<RegistroNotas>> {
        let row = sqlx::query_as::<_, RegistroNotas>(
            "SELECT id_, id_registro_notas, id_matriculas, nota1, nota2, sup, version \
             FROM registro_notas WHERE id_matriculas = ?",
        )
        .bind(id_matriculas)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_nota(&self, nota: &RegistroNotas) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO registro_notas (id_, id_registro_notas, id_matriculas, nota1, nota2, sup, version) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&nota.id)
        .bind(&nota.id_registro_notas)
        .bind(&nota.id_matriculas)
        .bind(nota.nota1)
        .bind(nota.nota2)
        .bind(nota.sup)
        .bind(nota.version)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_notas_by_matricula(&self, id_matriculas: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM registro_notas WHERE id_matriculas = ?")
            .bind(id_matriculas)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
