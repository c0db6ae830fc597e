//! Check-in route, used by the scanner and by direct student check-ins

use axum::{Json, extract::State, response::IntoResponse};
use common::clock;
use tracing::{error, info};

use crate::{
    error::ApiError,
    models::attendance::{CheckInRequest, CheckInResponse},
    models::session::SessionStatus,
    state::AppState,
    status::resolve_status,
};

/// Record a check-in against a live session. The arrival time-of-day is
/// resolved into a status with the session's thresholds; a repeat scan
/// returns the stored record instead of creating a duplicate.
pub async fn check_in(
    State(state): State<AppState>,
    Json(payload): Json<CheckInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.fingerprint_id.is_some() == payload.student_id.is_some() {
        return Err(ApiError::Validation(
            "Provide exactly one of fingerprint_id or student_id".to_string(),
        ));
    }

    let session = state
        .session_repository
        .find_by_id(payload.session_id)
        .await
        .map_err(|e| {
            error!("Failed to look up session: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::InvalidSession)?;

    if session.status != SessionStatus::Live {
        return Err(ApiError::InvalidSession);
    }

    let student = match payload.fingerprint_id {
        Some(fingerprint_id) => state
            .student_repository
            .find_by_fingerprint(fingerprint_id)
            .await
            .map_err(|e| {
                error!("Failed to look up fingerprint: {}", e);
                ApiError::InternalServerError
            })?
            .ok_or(ApiError::UnknownCredential)?,
        None => {
            // Checked above: student_id is present when fingerprint_id is not.
            let student_id = payload
                .student_id
                .ok_or_else(|| ApiError::Validation("student_id is required".to_string()))?;
            state
                .student_repository
                .find_by_id(student_id)
                .await
                .map_err(|e| {
                    error!("Failed to look up student: {}", e);
                    ApiError::InternalServerError
                })?
                .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?
        }
    };

    let arrival = clock::time_of_day(&clock::now());
    let status = resolve_status(arrival, session.late_after, session.absent_after);

    let (record, created) = state
        .attendance_repository
        .record(
            student.student_id,
            session.session_id,
            status,
            payload.fingerprint_id,
            payload.device_id.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Failed to record attendance: {}", e);
            ApiError::InternalServerError
        })?;

    if created {
        info!(
            "Check-in: student {} on session {} resolved {} at {}",
            student.student_code,
            session.session_id,
            record.status.as_str(),
            arrival
        );
    } else {
        info!(
            "Repeat check-in ignored: student {} already {} on session {}",
            student.student_code,
            record.status.as_str(),
            session.session_id
        );
    }

    let response = CheckInResponse {
        ok: true,
        status: record.status,
        already_recorded: !created,
    };

    Ok(Json(response))
}
