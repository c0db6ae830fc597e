//! Student repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::student::{NewStudent, Student, UpdateStudent};

/// Student repository
#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    /// Create a new student repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all students, ordered by student code
    pub async fn list_all(&self) -> Result<Vec<Student>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, student_code, full_name, year_level, fingerprint_id
            FROM students
            ORDER BY student_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(student_from_row).collect())
    }

    /// Create a new student
    pub async fn create(&self, new_student: &NewStudent) -> Result<Student> {
        let row = sqlx::query(
            r#"
            INSERT INTO students (id, student_code, full_name, year_level)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, student_code, full_name, year_level, fingerprint_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_student.student_code)
        .bind(&new_student.full_name)
        .bind(&new_student.year_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(student_from_row(&row))
    }

    /// Update a student. Returns false when the student does not exist.
    pub async fn update(&self, id: Uuid, update: &UpdateStudent) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET student_code = $1, full_name = $2, year_level = $3
            WHERE id = $4
            "#,
        )
        .bind(&update.student_code)
        .bind(&update.full_name)
        .bind(&update.year_level)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a student together with its enroll commands and attendance
    /// records, in one transaction. Returns false when the student does
    /// not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM enroll_commands WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM attendance WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Find a student by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, student_code, full_name, year_level, fingerprint_id
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    /// Find the student enrolled with the given fingerprint slot
    pub async fn find_by_fingerprint(&self, fingerprint_id: i32) -> Result<Option<Student>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, student_code, full_name, year_level, fingerprint_id
            FROM students
            WHERE fingerprint_id = $1
            "#,
        )
        .bind(fingerprint_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(student_from_row))
    }

    /// Total number of enrolled students
    pub async fn count_all(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM students")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("cnt"))
    }

    /// Next free fingerprint slot (max assigned + 1)
    pub async fn next_fingerprint_id(&self) -> Result<i32> {
        let row = sqlx::query(
            "SELECT COALESCE(MAX(fingerprint_id), 0) + 1 AS next_id FROM students",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("next_id"))
    }
}

fn student_from_row(row: &PgRow) -> Student {
    Student {
        student_id: row.get("id"),
        user_id: row.get("user_id"),
        student_code: row.get("student_code"),
        full_name: row.get("full_name"),
        year_level: row.get("year_level"),
        fingerprint_id: row.get("fingerprint_id"),
    }
}
