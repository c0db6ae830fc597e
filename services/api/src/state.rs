//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{
    AttendanceRepository, EnrollmentRepository, SessionRepository, StudentRepository,
    SubjectRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub student_repository: StudentRepository,
    pub subject_repository: SubjectRepository,
    pub session_repository: SessionRepository,
    pub attendance_repository: AttendanceRepository,
    pub enrollment_repository: EnrollmentRepository,
    pub jwt_service: JwtService,
}
