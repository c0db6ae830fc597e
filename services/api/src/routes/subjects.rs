//! Subject routes (staff only)

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, require_staff},
    models::subject::NewSubject,
    state::AppState,
};

/// Get the calling teacher's subjects
pub async fn list_subjects(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

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

    let subjects = state
        .subject_repository
        .list_for_teacher(profile.id)
        .await
        .map_err(|e| {
            error!("Failed to list subjects: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(serde_json::json!({ "subjects": subjects })))
}

/// Create a subject owned by the calling teacher
pub async fn create_subject(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<NewSubject>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

    if payload.subject_name.trim().is_empty() {
        return Err(ApiError::Validation("subject_name is required".to_string()));
    }

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
        .create(profile.id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create subject: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "subject": subject })),
    ))
}

/// Get all sessions for a subject, newest date first
pub async fn subject_sessions(
    State(state): State<AppState>,
    Path(subject_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let sessions = state
        .session_repository
        .list_by_subject(subject_id)
        .await
        .map_err(|e| {
            error!("Failed to list sessions for subject: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(serde_json::json!({ "sessions": sessions })))
}
