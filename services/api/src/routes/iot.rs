//! Scanner handshake routes
//!
//! The device polls `/api/iot/mode` to decide what to do: capture a
//! fingerprint for a pending enroll command, scan check-ins for the live
//! session, or idle. Enrollment is a `pending` -> `done` handshake that
//! ends with the fingerprint slot bound to the student.

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, require_staff},
    state::AppState,
};

/// What the scanner should be doing right now
#[derive(Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DeviceMode {
    Enroll {
        command_id: Uuid,
        fingerprint_id: i32,
    },
    Scan {
        session_id: Uuid,
    },
    Idle,
}

/// Request to queue a fingerprint enrollment for a student
#[derive(Deserialize)]
pub struct EnrollRequest {
    pub student_id: Uuid,
}

/// Device report that an enroll command has been captured
#[derive(Deserialize)]
pub struct EnrollDoneRequest {
    pub command_id: Uuid,
}

/// Live-session ping for the scanner
pub async fn live_session(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session_repository.find_live(None).await.map_err(|e| {
        error!("Failed to look up live session: {}", e);
        ApiError::InternalServerError
    })?;

    let body = match session {
        Some(session) => serde_json::json!({
            "live": true,
            "session_id": session.session_id,
        }),
        None => serde_json::json!({ "live": false }),
    };

    Ok(Json(body))
}

/// Current device mode: pending enrollment wins over scanning
pub async fn device_mode(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pending = state
        .enrollment_repository
        .next_pending()
        .await
        .map_err(|e| {
            error!("Failed to look up enroll commands: {}", e);
            ApiError::InternalServerError
        })?;

    if let Some(command) = pending {
        return Ok(Json(DeviceMode::Enroll {
            command_id: command.command_id,
            fingerprint_id: command.fingerprint_id,
        }));
    }

    let session = state.session_repository.find_live(None).await.map_err(|e| {
        error!("Failed to look up live session: {}", e);
        ApiError::InternalServerError
    })?;

    match session {
        Some(session) => Ok(Json(DeviceMode::Scan {
            session_id: session.session_id,
        })),
        None => Ok(Json(DeviceMode::Idle)),
    }
}

/// Queue a fingerprint enrollment for a student, allocating the next
/// free reader slot
pub async fn enroll_student(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<EnrollRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

    let student = state
        .student_repository
        .find_by_id(payload.student_id)
        .await
        .map_err(|e| {
            error!("Failed to look up student: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let fingerprint_id = state
        .student_repository
        .next_fingerprint_id()
        .await
        .map_err(|e| {
            error!("Failed to allocate fingerprint slot: {}", e);
            ApiError::InternalServerError
        })?;

    let command = state
        .enrollment_repository
        .create_command(student.student_id, fingerprint_id)
        .await
        .map_err(|e| {
            error!("Failed to create enroll command: {}", e);
            ApiError::InternalServerError
        })?;

    info!(
        "Queued enroll command {} for student {} (slot {})",
        command.command_id, student.student_code, fingerprint_id
    );

    Ok(Json(serde_json::json!({
        "command_id": command.command_id,
        "fingerprint_id": command.fingerprint_id,
    })))
}

/// Device report that an enrollment finished: bind the slot and close
/// the command
pub async fn enroll_done(
    State(state): State<AppState>,
    Json(payload): Json<EnrollDoneRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = state
        .enrollment_repository
        .complete(payload.command_id)
        .await
        .map_err(|e| {
            error!("Failed to complete enroll command: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Enroll command not found".to_string()))?;

    info!(
        "Enroll command {} done: student {} bound to slot {}",
        command.command_id, command.student_id, command.fingerprint_id
    );

    Ok(Json(serde_json::json!({ "ok": true })))
}
