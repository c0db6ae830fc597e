//! Repositories for database operations
//!
//! One repository per entity, each holding a cloned pool. The store is
//! the single source of truth: handlers read current state, decide, and
//! write back; the invariant-carrying writes (one live session per
//! teacher, one attendance record per student and session, the
//! live -> finished transition) are single atomic statements.

pub mod attendance;
pub mod enrollment;
pub mod session;
pub mod student;
pub mod subject;
pub mod user;

pub use attendance::AttendanceRepository;
pub use enrollment::EnrollmentRepository;
pub use session::SessionRepository;
pub use student::StudentRepository;
pub use subject::SubjectRepository;
pub use user::UserRepository;
