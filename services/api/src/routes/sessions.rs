//! Session lifecycle routes

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::clock;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, require_staff},
    models::session::{EndSessionResponse, LiveSession, StartSessionRequest},
    state::AppState,
    validation::validate_thresholds,
};

/// Query parameters for the live-session lookup
#[derive(Deserialize)]
pub struct LiveSessionQuery {
    pub owner_id: Option<Uuid>,
}

/// Start a session for the calling teacher. The one-live-session-per-
/// teacher rule is enforced by the insert itself; two concurrent starts
/// cannot both succeed.
pub async fn start_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;
    validate_thresholds(payload.late_min, payload.absent_min).map_err(ApiError::Validation)?;

    let profile = state
        .user_repository
        .find_teacher_profile(auth_user.id)
        .await
        .map_err(|e| {
            error!("Failed to look up teacher profile: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| {
            ApiError::Validation("No teacher profile for this account".to_string())
        })?;

    let subject = state
        .subject_repository
        .find_by_id(payload.subject_id)
        .await
        .map_err(|e| {
            error!("Failed to look up subject: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;

    if subject.teacher_id != profile.id {
        return Err(ApiError::NotFound("Subject not found".to_string()));
    }

    let now = clock::now();
    let session = state
        .session_repository
        .create_live(
            auth_user.id,
            subject.subject_id,
            clock::date_of(&now),
            clock::time_of_day(&now),
            Some(clock::time_of_day_after(&now, payload.late_min)),
            Some(clock::time_of_day_after(&now, payload.absent_min)),
        )
        .await
        .map_err(|e| {
            error!("Failed to start session: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| {
            ApiError::Conflict("A live session is already running for this teacher".to_string())
        })?;

    info!(
        "Started session {} for subject {} by {} (late after {:?}, absent after {:?})",
        session.session_id,
        subject.subject_name,
        profile.full_name,
        session.late_after,
        session.absent_after
    );

    Ok((StatusCode::CREATED, Json(session)))
}

/// End the calling teacher's live session. Racing the sweeper is safe:
/// whichever writer transitions the session first wins, the other sees
/// no live session.
pub async fn end_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

    let end_time = clock::time_of_day(&clock::now());
    let session = state
        .session_repository
        .end_live(auth_user.id, end_time)
        .await
        .map_err(|e| {
            error!("Failed to end session: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("No live session to end".to_string()))?;

    info!("Ended session {} at {}", session.session_id, end_time);

    let response = EndSessionResponse {
        session_id: session.session_id,
        end_time,
    };

    Ok(Json(response))
}

/// Get the current live session, optionally filtered by owner
pub async fn live_session(
    State(state): State<AppState>,
    Query(query): Query<LiveSessionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .session_repository
        .find_live(query.owner_id)
        .await
        .map_err(|e| {
            error!("Failed to look up live session: {}", e);
            ApiError::InternalServerError
        })?;

    let response = match session {
        Some(session) => LiveSession::active(session),
        None => LiveSession::idle(),
    };

    Ok(Json(response))
}

/// Get all sessions, newest first
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state.session_repository.list_all().await.map_err(|e| {
        error!("Failed to list sessions: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(sessions))
}

/// Per-student attendance for a session. Students with no record appear
/// with a null status.
pub async fn session_attendance(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .attendance_repository
        .list_for_session(session_id)
        .await
        .map_err(|e| {
            error!("Failed to list attendance: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(serde_json::json!({ "attendance": rows })))
}
