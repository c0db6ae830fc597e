//! Live dashboard route, designed for frequent polling
//!
//! Reads only; safe to call concurrently with check-ins and with the
//! sweeper. Counts may trail a check-in by one polling interval.

use axum::{Json, extract::State, response::IntoResponse};
use tracing::error;

use crate::{error::ApiError, models::dashboard::LiveSummary, state::AppState};

/// Summary of the current live session: per-status counts plus how many
/// enrolled students have not arrived yet. Returns the explicit idle
/// shape when no session is live.
pub async fn live_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let live = state
        .session_repository
        .find_live_with_subject(None)
        .await
        .map_err(|e| {
            error!("Failed to look up live session: {}", e);
            ApiError::InternalServerError
        })?;

    let Some(info) = live else {
        return Ok(Json(LiveSummary::idle()));
    };

    let counts = state
        .attendance_repository
        .counts_by_status(info.session_id)
        .await
        .map_err(|e| {
            error!("Failed to count attendance: {}", e);
            ApiError::InternalServerError
        })?;

    let total_students = state.student_repository.count_all().await.map_err(|e| {
        error!("Failed to count students: {}", e);
        ApiError::InternalServerError
    })?;

    let not_yet_arrived = (total_students - counts.checked_in()).max(0);

    let summary = LiveSummary::Active {
        live: true,
        session_id: info.session_id,
        subject: info.subject_name,
        date: info.date,
        start_time: info.start_time,
        late_after: info.late_after,
        absent_after: info.absent_after,
        present: counts.present,
        late: counts.late,
        absent: counts.absent,
        not_yet_arrived,
    };

    Ok(Json(summary))
}
