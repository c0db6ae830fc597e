//! Registration, login and profile routes

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::user::{NewUser, Role, UserResponse},
    state::AppState,
    validation::{validate_password, validate_username},
};

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub role: Option<Role>,
    pub student_code: Option<String>,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

/// Response carrying a bearer token and the public user view
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Register a new user and issue a token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    validate_username(&payload.username).map_err(ApiError::Validation)?;
    validate_password(&payload.password).map_err(ApiError::Validation)?;

    let role = payload.role.unwrap_or(Role::Student);
    if role == Role::Student
        && payload
            .student_code
            .as_deref()
            .is_none_or(|code| code.trim().is_empty())
    {
        return Err(ApiError::Validation(
            "student_code is required for student accounts".to_string(),
        ));
    }

    let taken = state
        .user_repository
        .username_or_email_taken(&payload.username, payload.email.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to check username availability: {}", e);
            ApiError::InternalServerError
        })?;

    if taken {
        return Err(ApiError::Conflict(
            "Username or email is already taken".to_string(),
        ));
    }

    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        role,
        full_name: payload.name,
        student_code: payload.student_code,
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        ApiError::InternalServerError
    })?;

    info!("Registered user {} with role {}", user.username, user.role.as_str());

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    let response = TokenResponse {
        token,
        expires_in: state.jwt_service.token_expiry(),
        user: UserResponse::from(&user),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Log a user in and issue a token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.username_or_email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let user = state
        .user_repository
        .find_by_username_or_email(&payload.username_or_email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    let valid = state
        .user_repository
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !valid {
        return Err(ApiError::Unauthorized);
    }

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    let response = TokenResponse {
        token,
        expires_in: state.jwt_service.token_expiry(),
        user: UserResponse::from(&user),
    };

    Ok(Json(response))
}

/// Get the authenticated user's profile
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(auth_user.id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(serde_json::json!({ "user": UserResponse::from(&user) })))
}
