//! # Account Handlers
//!
//! Registration, login and logout. Login hands out a signed session token;
//! logout has nothing to revoke and only confirms.

use super::{AppError, AppState, DebugParams};
use crate::{
    auth::{issue_token, OptionalUser},
    handlers::wrap_response,
    types::{ApiResponse, Notice},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use core_access::{authenticate, register_user, Registration};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub message: String,
}

/// The handler for `POST /register`.
pub async fn register_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<Credentials>,
) -> Result<(StatusCode, Json<ApiResponse<Notice>>), AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required.".to_string(),
        ));
    }

    match register_user(
        &app_state.sqlite_provider.db,
        &payload.username,
        &payload.password,
    )
    .await?
    {
        Registration::Created(_) => {
            let notice = Notice::new("Registration successful! Please log in.").redirect_to("/login");
            Ok((StatusCode::CREATED, wrap_response(notice, debug_params, None)))
        }
        Registration::UsernameTaken => Err(AppError::Conflict("Username already exists.".to_string())),
    }
}

/// The handler for `POST /login`.
pub async fn login_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<Credentials>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let user = authenticate(
        &app_state.sqlite_provider.db,
        &payload.username,
        &payload.password,
    )
    .await?
    .ok_or_else(|| {
        warn!(username = %payload.username, "Login failed.");
        AppError::Unauthorized("Login failed. Check username and/or password.".to_string())
    })?;

    let token = issue_token(
        &app_state.config.jwt_secret,
        &user,
        app_state.config.token_ttl_secs,
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    info!(user_id = user.id, "User logged in.");
    let response = LoginResponse {
        token,
        username: user.username,
        message: "Login successful!".to_string(),
    };
    Ok(wrap_response(response, debug_params, None))
}

/// The handler for `POST /logout`.
pub async fn logout_handler(
    current_user: OptionalUser,
    debug_params: Query<DebugParams>,
) -> Json<ApiResponse<Notice>> {
    if let Some(user) = current_user.0 {
        info!(user_id = user.id, "User logged out.");
    }
    wrap_response(
        Notice::new("Logged out successfully.").redirect_to("/"),
        debug_params,
        None,
    )
}
