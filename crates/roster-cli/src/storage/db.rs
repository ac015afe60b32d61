//! PostgreSQL database layer

use anyhow::{Context, Result};
use async_trait::async_trait;
use roster_core::ports::{ReferenceSource, StudentStore};
use roster_core::supply::ReferenceData;
use roster_core::{
    EntityKind, NewStudent, Part, Project, RosterError, Student, StudentPatch, Supplier,
};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool, Postgres};
use std::path::Path;

const STUDENT_COLUMNS: &str = "id, name, email, course, created_at";

fn db_err(e: sqlx::Error) -> RosterError {
    RosterError::Database(e.to_string())
}

/// Connection pool shared by the Postgres stores
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(options: PgConnectOptions) -> Result<Self> {
        tracing::info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to connect to PostgreSQL")?;

        tracing::info!("PostgreSQL connection established");

        Ok(Self { pool })
    }

    /// Run every statement in a schema file
    pub async fn apply_schema(&self, path: &Path) -> Result<()> {
        tracing::info!("Applying schema from {}", path.display());

        let sql = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;

        let mut conn = self.pool.acquire().await?;
        (&mut *conn)
            .execute(sql.as_str())
            .await
            .with_context(|| format!("Failed to apply schema: {}", path.display()))?;

        Ok(())
    }

    /// Scoped connection; returned to the pool when dropped
    async fn acquire(&self) -> roster_core::Result<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(db_err)
    }
}

/// Student rows in the `students` table
pub struct PgStudentStore {
    db: Database,
}

impl PgStudentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn insert_student(&self, student: &NewStudent) -> roster_core::Result<Student> {
        let mut conn = self.db.acquire().await?;

        let row: StudentRow = sqlx::query_as(&format!(
            "INSERT INTO students (name, email, course) VALUES ($1, $2, $3) RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.course)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;

        Ok(row.into())
    }

    async fn get_student(&self, id: i32) -> roster_core::Result<Option<Student>> {
        let mut conn = self.db.acquire().await?;

        let row: Option<StudentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn update_student(
        &self,
        id: i32,
        patch: &StudentPatch,
    ) -> roster_core::Result<Option<Student>> {
        let mut conn = self.db.acquire().await?;

        // NULL parameters leave the column as it was
        let row: Option<StudentRow> = sqlx::query_as(&format!(
            r#"
            UPDATE students
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                course = COALESCE($3, course)
            WHERE id = $4
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(patch.name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.course.as_deref())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;

        Ok(row.map(Into::into))
    }

    async fn delete_student(&self, id: i32) -> roster_core::Result<bool> {
        let mut conn = self.db.acquire().await?;

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_students(&self) -> roster_core::Result<Vec<Student>> {
        let mut conn = self.db.acquire().await?;

        let rows: Vec<StudentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM students ORDER BY id",
            STUDENT_COLUMNS
        ))
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Supplier, part and project tables
pub struct PgReferenceSource {
    db: Database,
}

impl PgReferenceSource {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceSource for PgReferenceSource {
    async fn load_references(&self) -> roster_core::Result<ReferenceData> {
        let mut conn = self.db.acquire().await?;

        let suppliers: Vec<SupplierRow> =
            sqlx::query_as("SELECT snum, sname, status, city FROM suppliers ORDER BY snum")
                .fetch_all(&mut *conn)
                .await
                .map_err(db_err)?;

        // NUMERIC weight is read as float8
        let parts: Vec<PartRow> = sqlx::query_as(
            "SELECT pnum, pname, color, weight::float8 AS weight, city FROM parts ORDER BY pnum",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;

        let projects: Vec<ProjectRow> =
            sqlx::query_as("SELECT jnum, jname, city FROM projects ORDER BY jnum")
                .fetch_all(&mut *conn)
                .await
                .map_err(db_err)?;

        Ok(ReferenceData::from_records(
            suppliers.into_iter().map(Supplier::from),
            parts.into_iter().map(Part::from),
            projects.into_iter().map(Project::from),
        ))
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct StudentRow {
    id: i32,
    name: String,
    email: String,
    course: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<StudentRow> for Student {
    fn from(r: StudentRow) -> Self {
        Student {
            id: r.id,
            name: r.name,
            email: r.email,
            course: r.course,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SupplierRow {
    snum: i32,
    sname: String,
    status: Option<i32>,
    city: Option<String>,
}

impl From<SupplierRow> for Supplier {
    fn from(r: SupplierRow) -> Self {
        Supplier {
            code: EntityKind::Supplier.code(r.snum),
            name: r.sname,
            status: r.status,
            city: r.city,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PartRow {
    pnum: i32,
    pname: String,
    color: Option<String>,
    weight: Option<f64>,
    city: Option<String>,
}

impl From<PartRow> for Part {
    fn from(r: PartRow) -> Self {
        Part {
            code: EntityKind::Part.code(r.pnum),
            name: r.pname,
            color: r.color,
            weight: r.weight,
            city: r.city,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    jnum: i32,
    jname: String,
    city: Option<String>,
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Project {
            code: EntityKind::Project.code(r.jnum),
            name: r.jname,
            city: r.city,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rows_get_composite_codes() {
        let supplier: Supplier = SupplierRow {
            snum: 4,
            sname: "Clark".to_string(),
            status: None,
            city: Some("London".to_string()),
        }
        .into();
        assert_eq!(supplier.code, "S4");
        assert_eq!(supplier.status, None);

        let part: Part = PartRow {
            pnum: 2,
            pname: "Bolt".to_string(),
            color: Some("Green".to_string()),
            weight: Some(17.0),
            city: None,
        }
        .into();
        assert_eq!(part.code, "P2");
        assert_eq!(part.weight, Some(17.0));

        let project: Project = ProjectRow {
            jnum: 7,
            jname: "Tape".to_string(),
            city: None,
        }
        .into();
        assert_eq!(project.code, "J7");
    }
}
