//! Integration tests for the store-level lifecycle invariants
//!
//! These exercise the constraints the session and attendance logic rely
//! on: the partial unique index serializing session starts per owner,
//! the compare-and-set close shared by manual end and the sweeper, and
//! the (student, session) uniqueness that collapses repeat scans.
//!
//! They need a provisioned PostgreSQL with `schema.sql` applied and are
//! ignored by default; run with `cargo test -- --ignored` against a
//! scratch database.

use chrono::{NaiveDate, NaiveTime};
use common::database::{DatabaseConfig, init_pool};
use serial_test::serial;
use sqlx::{PgPool, Row};
use uuid::Uuid;

struct Fixture {
    user_id: Uuid,
    subject_id: Uuid,
    student_id: Uuid,
}

async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    Ok(init_pool(&config).await?)
}

/// Seed a teacher account, one subject and one student with unique keys.
async fn seed(pool: &PgPool) -> Result<Fixture, Box<dyn std::error::Error>> {
    let user_id = Uuid::new_v4();
    let teacher_id = Uuid::new_v4();
    let subject_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, role) VALUES ($1, $2, 'x', 'teacher')",
    )
    .bind(user_id)
    .bind(format!("t_{}", user_id.simple()))
    .execute(pool)
    .await?;

    sqlx::query("INSERT INTO teachers (id, user_id, full_name) VALUES ($1, $2, 'Test Teacher')")
        .bind(teacher_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    sqlx::query(
        "INSERT INTO subjects (id, subject_name, teacher_id) VALUES ($1, 'Physics', $2)",
    )
    .bind(subject_id)
    .bind(teacher_id)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO students (id, student_code, full_name) VALUES ($1, $2, 'Test Student')",
    )
    .bind(student_id)
    .bind(format!("s_{}", student_id.simple()))
    .execute(pool)
    .await?;

    Ok(Fixture {
        user_id,
        subject_id,
        student_id,
    })
}

async fn insert_live_session(
    pool: &PgPool,
    fixture: &Fixture,
    absent_after: NaiveTime,
) -> Result<Uuid, sqlx::Error> {
    let session_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO sessions (id, subject_id, date, start_time, late_after, absent_after, status, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, 'live', $7)
        "#,
    )
    .bind(session_id)
    .bind(fixture.subject_id)
    .bind(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    .bind(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
    .bind(NaiveTime::from_hms_opt(9, 15, 0).unwrap())
    .bind(absent_after)
    .bind(fixture.user_id)
    .execute(pool)
    .await?;

    Ok(session_id)
}

#[tokio::test]
#[serial]
#[ignore = "requires a provisioned PostgreSQL with schema.sql applied"]
async fn test_second_live_session_for_same_owner_is_rejected(
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let fixture = seed(&pool).await?;
    let cutoff = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    insert_live_session(&pool, &fixture, cutoff).await?;

    let second = insert_live_session(&pool, &fixture, cutoff).await;
    match second {
        Err(sqlx::Error::Database(db)) => {
            assert_eq!(db.constraint(), Some("sessions_one_live_per_teacher"));
        }
        other => panic!("expected a unique violation, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires a provisioned PostgreSQL with schema.sql applied"]
async fn test_end_transition_is_compare_and_set() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let fixture = seed(&pool).await?;
    let session_id = insert_live_session(
        &pool,
        &fixture,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    )
    .await?;

    let close = r#"
        UPDATE sessions
        SET status = 'finished', end_time = $1
        WHERE created_by = $2 AND status = 'live'
    "#;

    // First close wins.
    let first = sqlx::query(close)
        .bind(NaiveTime::from_hms_opt(9, 40, 0).unwrap())
        .bind(fixture.user_id)
        .execute(&pool)
        .await?;
    assert_eq!(first.rows_affected(), 1);

    // Second close (e.g. the sweeper losing the race) is a no-op.
    let second = sqlx::query(close)
        .bind(NaiveTime::from_hms_opt(9, 41, 0).unwrap())
        .bind(fixture.user_id)
        .execute(&pool)
        .await?;
    assert_eq!(second.rows_affected(), 0);

    // The first writer's end time survives.
    let row = sqlx::query("SELECT status, end_time FROM sessions WHERE id = $1")
        .bind(session_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(row.get::<String, _>("status"), "finished");
    assert_eq!(
        row.get::<Option<NaiveTime>, _>("end_time"),
        NaiveTime::from_hms_opt(9, 40, 0)
    );

    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires a provisioned PostgreSQL with schema.sql applied"]
async fn test_sweep_only_closes_overdue_sessions() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let overdue_owner = seed(&pool).await?;
    let running_owner = seed(&pool).await?;

    let overdue = insert_live_session(
        &pool,
        &overdue_owner,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    )
    .await?;
    let still_running = insert_live_session(
        &pool,
        &running_owner,
        NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
    )
    .await?;

    // Sweep as of 10:05: only the first session's cutoff has elapsed.
    let swept = sqlx::query(
        r#"
        UPDATE sessions
        SET status = 'finished', end_time = $1
        WHERE status = 'live' AND absent_after <= $1
        RETURNING id
        "#,
    )
    .bind(NaiveTime::from_hms_opt(10, 5, 0).unwrap())
    .fetch_all(&pool)
    .await?;

    let swept_ids: Vec<Uuid> = swept.iter().map(|row| row.get("id")).collect();
    assert!(swept_ids.contains(&overdue));
    assert!(!swept_ids.contains(&still_running));

    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires a provisioned PostgreSQL with schema.sql applied"]
async fn test_repeat_check_in_keeps_a_single_record() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let fixture = seed(&pool).await?;
    let session_id = insert_live_session(
        &pool,
        &fixture,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    )
    .await?;

    let insert = r#"
        INSERT INTO attendance (id, student_id, session_id, status)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (student_id, session_id) DO NOTHING
    "#;

    let first = sqlx::query(insert)
        .bind(Uuid::new_v4())
        .bind(fixture.student_id)
        .bind(session_id)
        .bind("Present")
        .execute(&pool)
        .await?;
    assert_eq!(first.rows_affected(), 1);

    // Repeat scan, later in the session: no second row, stored status wins.
    let second = sqlx::query(insert)
        .bind(Uuid::new_v4())
        .bind(fixture.student_id)
        .bind(session_id)
        .bind("Late")
        .execute(&pool)
        .await?;
    assert_eq!(second.rows_affected(), 0);

    let row = sqlx::query(
        "SELECT COUNT(*) AS cnt, MIN(status) AS status FROM attendance WHERE student_id = $1 AND session_id = $2",
    )
    .bind(fixture.student_id)
    .bind(session_id)
    .fetch_one(&pool)
    .await?;
    assert_eq!(row.get::<i64, _>("cnt"), 1);
    assert_eq!(row.get::<String, _>("status"), "Present");

    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires a provisioned PostgreSQL with schema.sql applied"]
async fn test_attendance_list_left_joins_missing_students(
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let fixture = seed(&pool).await?;
    let session_id = insert_live_session(
        &pool,
        &fixture,
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    )
    .await?;

    // The seeded student never checks in; the roster row must still be
    // returned, with a null status.
    let rows = sqlx::query(
        r#"
        SELECT st.id AS student_id, a.status
        FROM students st
        LEFT JOIN attendance a ON st.id = a.student_id AND a.session_id = $1
        WHERE st.id = $2
        "#,
    )
    .bind(session_id)
    .bind(fixture.student_id)
    .fetch_all(&pool)
    .await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<Option<String>, _>("status"), None);

    Ok(())
}
