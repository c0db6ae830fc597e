//! Subject repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::subject::{NewSubject, Subject};

/// Subject repository
#[derive(Clone)]
pub struct SubjectRepository {
    pool: PgPool,
}

impl SubjectRepository {
    /// Create a new subject repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all subjects owned by a teacher profile
    pub async fn list_for_teacher(&self, teacher_id: Uuid) -> Result<Vec<Subject>> {
        let rows = sqlx::query(
            r#"
            SELECT id, subject_name, subject_code, teacher_id
            FROM subjects
            WHERE teacher_id = $1
            ORDER BY subject_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(subject_from_row).collect())
    }

    /// Create a new subject owned by a teacher profile
    pub async fn create(&self, teacher_id: Uuid, new_subject: &NewSubject) -> Result<Subject> {
        let row = sqlx::query(
            r#"
            INSERT INTO subjects (id, subject_name, subject_code, teacher_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, subject_name, subject_code, teacher_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_subject.subject_name)
        .bind(&new_subject.subject_code)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject_from_row(&row))
    }

    /// Find a subject by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Subject>> {
        let row = sqlx::query(
            r#"
            SELECT id, subject_name, subject_code, teacher_id
            FROM subjects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(subject_from_row))
    }
}

fn subject_from_row(row: &PgRow) -> Subject {
    Subject {
        subject_id: row.get("id"),
        subject_name: row.get("subject_name"),
        subject_code: row.get("subject_code"),
        teacher_id: row.get("teacher_id"),
    }
}
