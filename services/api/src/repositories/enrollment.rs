//! Enroll-command repository for database operations
//!
//! Enroll commands drive the scanner handshake: the teacher queues a
//! `pending` command, the device polls for it, captures the fingerprint
//! into the allocated slot, then reports completion which binds the slot
//! to the student and closes the command.

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::enrollment::{EnrollCommand, EnrollStatus};

/// Enroll-command repository
#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    /// Create a new enroll-command repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Queue a pending enroll command for a student
    pub async fn create_command(
        &self,
        student_id: Uuid,
        fingerprint_id: i32,
    ) -> Result<EnrollCommand> {
        let row = sqlx::query(
            r#"
            INSERT INTO enroll_commands (id, student_id, fingerprint_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, student_id, fingerprint_id, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(fingerprint_id)
        .bind(EnrollStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        command_from_row(&row)
    }

    /// Oldest pending command, if any. This is what the scanner polls.
    pub async fn next_pending(&self) -> Result<Option<EnrollCommand>> {
        let row = sqlx::query(
            r#"
            SELECT id, student_id, fingerprint_id, status, created_at
            FROM enroll_commands
            WHERE status = 'pending'
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(command_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Complete an enroll command: bind the fingerprint slot to the
    /// student and mark the command done, in one transaction. Returns
    /// `None` when the command does not exist.
    pub async fn complete(&self, command_id: Uuid) -> Result<Option<EnrollCommand>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, student_id, fingerprint_id, status, created_at
            FROM enroll_commands
            WHERE id = $1
            "#,
        )
        .bind(command_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let command = command_from_row(&row)?;

        sqlx::query("UPDATE students SET fingerprint_id = $1 WHERE id = $2")
            .bind(command.fingerprint_id)
            .bind(command.student_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE enroll_commands SET status = $1 WHERE id = $2")
            .bind(EnrollStatus::Done.as_str())
            .bind(command_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(EnrollCommand {
            status: EnrollStatus::Done,
            ..command
        }))
    }
}

fn command_from_row(row: &PgRow) -> Result<EnrollCommand> {
    let status: String = row.get("status");
    let status = EnrollStatus::from_str(&status)
        .ok_or_else(|| anyhow::anyhow!("Unexpected enroll command status: {}", status))?;

    Ok(EnrollCommand {
        command_id: row.get("id"),
        student_id: row.get("student_id"),
        fingerprint_id: row.get("fingerprint_id"),
        status,
        created_at: row.get("created_at"),
    })
}
