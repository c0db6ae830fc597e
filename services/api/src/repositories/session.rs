//! Session repository for database operations

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::session::{LiveSessionInfo, Session, SessionStatus};

/// Name of the partial unique index enforcing at most one live session
/// per teacher. A violation is a business conflict, not a server error.
const ONE_LIVE_PER_TEACHER: &str = "sessions_one_live_per_teacher";

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically create a session in `live` status. Returns `None` when
    /// the owner already has a live session: the uniqueness check is
    /// carried by the partial unique index in the same insert, so two
    /// concurrent starts cannot both succeed.
    pub async fn create_live(
        &self,
        created_by: Uuid,
        subject_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        late_after: Option<NaiveTime>,
        absent_after: Option<NaiveTime>,
    ) -> Result<Option<Session>> {
        let result = sqlx::query(
            r#"
            INSERT INTO sessions (id, subject_id, date, start_time, late_after, absent_after, status, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, subject_id, date, start_time, late_after, absent_after, end_time, status, created_by, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subject_id)
        .bind(date)
        .bind(start_time)
        .bind(late_after)
        .bind(absent_after)
        .bind(SessionStatus::Live.as_str())
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(Some(session_from_row(&row)?)),
            Err(sqlx::Error::Database(db)) if db.constraint() == Some(ONE_LIVE_PER_TEACHER) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Close the owner's live session. The update is conditioned on
    /// `status = 'live'`, so a manual end racing the sweeper results in
    /// exactly one effective transition; the loser sees `None`.
    pub async fn end_live(&self, created_by: Uuid, end_time: NaiveTime) -> Result<Option<Session>> {
        let row = sqlx::query(
            r#"
            UPDATE sessions
            SET status = 'finished', end_time = $1
            WHERE created_by = $2 AND status = 'live'
            RETURNING id, subject_id, date, start_time, late_after, absent_after, end_time, status, created_by, created_at
            "#,
        )
        .bind(end_time)
        .bind(created_by)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(session_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Force-close every live session whose absent cutoff has elapsed.
    /// Returns the ids of the sessions closed by this sweep.
    pub async fn close_overdue(&self, now: NaiveTime) -> Result<Vec<Uuid>> {
        let rows = sqlx::query(
            r#"
            UPDATE sessions
            SET status = 'finished', end_time = $1
            WHERE status = 'live' AND absent_after <= $1
            RETURNING id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.get("id")).collect())
    }

    /// Find a session by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>> {
        let row = sqlx::query(
            r#"
            SELECT id, subject_id, date, start_time, late_after, absent_after, end_time, status, created_by, created_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(session_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Find the live session, optionally filtered by owner. Without an
    /// owner filter the most recently started live session is returned.
    pub async fn find_live(&self, created_by: Option<Uuid>) -> Result<Option<Session>> {
        let row = match created_by {
            Some(owner) => {
                sqlx::query(
                    r#"
                    SELECT id, subject_id, date, start_time, late_after, absent_after, end_time, status, created_by, created_at
                    FROM sessions
                    WHERE status = 'live' AND created_by = $1
                    "#,
                )
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, subject_id, date, start_time, late_after, absent_after, end_time, status, created_by, created_at
                    FROM sessions
                    WHERE status = 'live'
                    ORDER BY created_at DESC
                    LIMIT 1
                    "#,
                )
                .fetch_optional(&self.pool)
                .await?
            }
        };

        match row {
            Some(row) => Ok(Some(session_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Find the live session joined with its subject name, for the
    /// dashboard summary.
    pub async fn find_live_with_subject(
        &self,
        created_by: Option<Uuid>,
    ) -> Result<Option<LiveSessionInfo>> {
        let row = match created_by {
            Some(owner) => {
                sqlx::query(
                    r#"
                    SELECT s.id, sb.subject_name, s.date, s.start_time, s.late_after, s.absent_after
                    FROM sessions s
                    JOIN subjects sb ON s.subject_id = sb.id
                    WHERE s.status = 'live' AND s.created_by = $1
                    "#,
                )
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT s.id, sb.subject_name, s.date, s.start_time, s.late_after, s.absent_after
                    FROM sessions s
                    JOIN subjects sb ON s.subject_id = sb.id
                    WHERE s.status = 'live'
                    ORDER BY s.created_at DESC
                    LIMIT 1
                    "#,
                )
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(row.map(|row| LiveSessionInfo {
            session_id: row.get("id"),
            subject_name: row.get("subject_name"),
            date: row.get("date"),
            start_time: row.get("start_time"),
            late_after: row.get("late_after"),
            absent_after: row.get("absent_after"),
        }))
    }

    /// Get all sessions, newest first
    pub async fn list_all(&self) -> Result<Vec<Session>> {
        let rows = sqlx::query(
            r#"
            SELECT id, subject_id, date, start_time, late_after, absent_after, end_time, status, created_by, created_at
            FROM sessions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(session_from_row).collect()
    }

    /// Get all sessions for a subject, newest date first
    pub async fn list_by_subject(&self, subject_id: Uuid) -> Result<Vec<Session>> {
        let rows = sqlx::query(
            r#"
            SELECT id, subject_id, date, start_time, late_after, absent_after, end_time, status, created_by, created_at
            FROM sessions
            WHERE subject_id = $1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(session_from_row).collect()
    }
}

fn session_from_row(row: &PgRow) -> Result<Session> {
    let status: String = row.get("status");
    let status = SessionStatus::from_str(&status)
        .ok_or_else(|| anyhow::anyhow!("Unexpected session status: {}", status))?;

    Ok(Session {
        session_id: row.get("id"),
        subject_id: row.get("subject_id"),
        date: row.get("date"),
        start_time: row.get("start_time"),
        late_after: row.get("late_after"),
        absent_after: row.get("absent_after"),
        end_time: row.get("end_time"),
        status,
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
    })
}
