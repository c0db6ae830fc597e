//! Student roster routes (staff only)

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, require_staff},
    models::student::{NewStudent, UpdateStudent},
    state::AppState,
};

/// Get the full student roster
pub async fn list_students(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

    let students = state.student_repository.list_all().await.map_err(|e| {
        error!("Failed to list students: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(serde_json::json!({ "students": students })))
}

/// Create a new student
pub async fn create_student(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<NewStudent>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

    if payload.student_code.trim().is_empty() || payload.full_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "student_code and full_name are required".to_string(),
        ));
    }

    let student = state
        .student_repository
        .create(&payload)
        .await
        .map_err(|e| {
            error!("Failed to create student: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(student)))
}

/// Update a student
pub async fn update_student(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudent>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

    if payload.student_code.trim().is_empty() || payload.full_name.trim().is_empty() {
        return Err(ApiError::Validation(
            "student_code and full_name are required".to_string(),
        ));
    }

    let updated = state
        .student_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update student: {}", e);
            ApiError::InternalServerError
        })?;

    if !updated {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Delete a student together with its enroll commands and attendance
pub async fn delete_student(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&auth_user)?;

    let deleted = state.student_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete student: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    info!("Deleted student {}", id);

    Ok(Json(serde_json::json!({ "ok": true })))
}
