//! API service routes

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod iot;
pub mod sessions;
pub mod students;
pub mod subjects;

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

/// Create the router for the attendance API
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/me", get(auth::me))
        .route("/api/sessions", get(sessions::list_sessions))
        .route("/api/sessions/start", post(sessions::start_session))
        .route("/api/sessions/end", post(sessions::end_session))
        .route("/api/sessions/live", get(sessions::live_session))
        .route("/api/sessions/:id/attendance", get(sessions::session_attendance))
        .route("/api/subjects/:id/sessions", get(subjects::subject_sessions))
        .route(
            "/api/teacher/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/api/teacher/students/:id",
            put(students::update_student).delete(students::delete_student),
        )
        .route(
            "/api/teacher/subjects",
            get(subjects::list_subjects).post(subjects::create_subject),
        )
        .route("/api/teacher/enroll", post(iot::enroll_student))
        .route("/api/dashboard/live-summary", get(dashboard::live_summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // The scanner endpoints are unauthenticated: the device carries no
    // user token, only fingerprint credentials and command ids.
    Router::new()
        .route("/health", get(health_check))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/attendance", post(attendance::check_in))
        .route("/api/iot/live-session", get(iot::live_session))
        .route("/api/iot/mode", get(iot::device_mode))
        .route("/api/iot/enroll/done", post(iot::enroll_done))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool).await.is_ok();

    Json(json!({
        "status": "ok",
        "service": "attendance-api",
        "database": database
    }))
}
