//! Auth route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::auth::{CurrentUser, RequireAuth, clear_session, set_current_user};
use crate::models::{ProfileUpdate, User};
use crate::response::ApiResponse;
use crate::services::AuthService;
use crate::services::auth::RegisterRequest;
use crate::state::AppState;

/// A login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A password change request body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// A forgot-password request body.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<User>>> {
    let user = AuthService::new(state.pool()).register(&req).await?;
    Ok(ApiResponse::ok_with_message(user, "Registration successful"))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<User>>> {
    let (Some(email), Some(password)) = (req.email.as_deref(), req.password.as_deref()) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let user = AuthService::new(state.pool()).login(email, password).await?;

    set_current_user(&session, &CurrentUser::from(&user))
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session: {e}")))?;

    Ok(ApiResponse::ok_with_message(user, "Login successful"))
}

/// `POST /api/auth/logout`
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>> {
    clear_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    Ok(ApiResponse::message("Logout successful"))
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<ApiResponse<User>>> {
    let user = AuthService::new(state.pool()).current_user(current.id).await?;
    Ok(ApiResponse::ok(user))
}

/// `POST /api/auth/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ApiResponse<User>>> {
    let user = AuthService::new(state.pool())
        .update_profile(current.id, &update)
        .await?;
    Ok(ApiResponse::ok_with_message(
        user,
        "Profile updated successfully",
    ))
}

/// `POST /api/auth/password`
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    AuthService::new(state.pool())
        .change_password(
            current.id,
            req.current_password.as_deref().unwrap_or_default(),
            req.new_password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(ApiResponse::message("Password changed successfully"))
}

/// `POST /api/auth/password/forgot`
///
/// The reset token is stored server-side and delivered out-of-band; the
/// response only confirms the request.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>> {
    AuthService::new(state.pool())
        .forgot_password(req.email.as_deref().unwrap_or_default())
        .await?;
    Ok(ApiResponse::message(
        "Password reset instructions sent to your email",
    ))
}
