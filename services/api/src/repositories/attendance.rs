//! Attendance repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::attendance::{AttendanceRecord, AttendanceRow, AttendanceStatus, StatusCounts};

/// Attendance repository
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Create a new attendance repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a check-in. The insert carries the uniqueness invariant on
    /// (student, session): a repeat scan hits the conflict clause, does
    /// not create a second row, and the already-stored record is
    /// returned. The boolean is true when this call created the record.
    pub async fn record(
        &self,
        student_id: Uuid,
        session_id: Uuid,
        status: AttendanceStatus,
        fingerprint_id: Option<i32>,
        device_id: Option<&str>,
    ) -> Result<(AttendanceRecord, bool)> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO attendance (id, student_id, session_id, status, fingerprint_id, device_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (student_id, session_id) DO NOTHING
            RETURNING id, student_id, session_id, status, time_stamp, fingerprint_id, device_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(session_id)
        .bind(status.as_str())
        .bind(fingerprint_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok((record_from_row(&row)?, true));
        }

        // Lost the insert race or repeat scan: return the surviving row.
        let row = sqlx::query(
            r#"
            SELECT id, student_id, session_id, status, time_stamp, fingerprint_id, device_id
            FROM attendance
            WHERE student_id = $1 AND session_id = $2
            "#,
        )
        .bind(student_id)
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((record_from_row(&row)?, false))
    }

    /// Attendance counts for a session, grouped by resolved status
    pub async fn counts_by_status(&self, session_id: Uuid) -> Result<StatusCounts> {
        let rows = sqlx::query(
            r#"
            SELECT status, COUNT(*) AS cnt
            FROM attendance
            WHERE session_id = $1
            GROUP BY status
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for row in rows {
            let status: String = row.get("status");
            let cnt: i64 = row.get("cnt");
            match AttendanceStatus::from_str(&status) {
                Some(AttendanceStatus::Present) => counts.present = cnt,
                Some(AttendanceStatus::Late) => counts.late = cnt,
                Some(AttendanceStatus::Absent) => counts.absent = cnt,
                None => anyhow::bail!("Unexpected attendance status: {}", status),
            }
        }

        Ok(counts)
    }

    /// Per-student attendance for a session, left-joined against the
    /// roster so students with no record appear with a null status.
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<AttendanceRow>> {
        let rows = sqlx::query(
            r#"
            SELECT st.id AS student_id, st.student_code, st.full_name,
                   a.status, a.time_stamp, a.device_id
            FROM students st
            LEFT JOIN attendance a
              ON st.id = a.student_id AND a.session_id = $1
            ORDER BY st.student_code
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let status: Option<String> = row.get("status");
                let status = match status {
                    Some(s) => Some(
                        AttendanceStatus::from_str(&s)
                            .ok_or_else(|| anyhow::anyhow!("Unexpected attendance status: {}", s))?,
                    ),
                    None => None,
                };

                Ok(AttendanceRow {
                    student_id: row.get("student_id"),
                    student_code: row.get("student_code"),
                    full_name: row.get("full_name"),
                    status,
                    time_stamp: row.get("time_stamp"),
                    device_id: row.get("device_id"),
                })
            })
            .collect()
    }
}

fn record_from_row(row: &PgRow) -> Result<AttendanceRecord> {
    let status: String = row.get("status");
    let status = AttendanceStatus::from_str(&status)
        .ok_or_else(|| anyhow::anyhow!("Unexpected attendance status: {}", status))?;

    Ok(AttendanceRecord {
        record_id: row.get("id"),
        student_id: row.get("student_id"),
        session_id: row.get("session_id"),
        status,
        time_stamp: row.get("time_stamp"),
        fingerprint_id: row.get("fingerprint_id"),
        device_id: row.get("device_id"),
    })
}
