use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

mod error;
mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;
mod status;
mod sweeper;
mod validation;

use common::database::{DatabaseConfig, init_pool};

use crate::{
    jwt::{JwtConfig, JwtService},
    repositories::{
        AttendanceRepository, EnrollmentRepository, SessionRepository, StudentRepository,
        SubjectRepository, UserRepository,
    },
    state::AppState,
    sweeper::SessionSweeper,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    info!("Starting attendance API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let jwt_service = JwtService::new(&JwtConfig::from_env()?);

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let student_repository = StudentRepository::new(pool.clone());
    let subject_repository = SubjectRepository::new(pool.clone());
    let session_repository = SessionRepository::new(pool.clone());
    let attendance_repository = AttendanceRepository::new(pool.clone());
    let enrollment_repository = EnrollmentRepository::new(pool.clone());

    // Start the session sweeper
    let sweep_schedule =
        std::env::var("SWEEP_SCHEDULE").unwrap_or_else(|_| "0/10 * * * * *".to_string());
    let session_sweeper = SessionSweeper::new(session_repository.clone());
    session_sweeper.start(&sweep_schedule).await?;

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        student_repository,
        subject_repository,
        session_repository,
        attendance_repository,
        enrollment_repository,
        jwt_service,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Attendance API listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
