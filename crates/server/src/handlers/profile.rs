use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::{auth::CurrentUser, types::Notice};
use axum::{
    extract::{Query, State},
    Json,
};
use bookrec::personal::list_favorites;
use core_access::delete_user;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub username: String,
    pub favorites: Vec<String>,
}

/// The handler for `GET /profile`.
pub async fn profile_handler(
    State(app_state): State<AppState>,
    current_user: CurrentUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let user = current_user.require("view your profile")?;

    let favorites = list_favorites(&app_state.sqlite_provider.db, user.id).await?;
    let debug_info = json!({ "user_id": user.id });
    let profile = ProfileResponse {
        username: user.username,
        favorites,
    };
    Ok(wrap_response(profile, debug_params, Some(debug_info)))
}

/// The handler for `POST /delete_profile`.
///
/// Removes the account with its favorites and search history. Tokens issued
/// to the account stop working once the user row is gone.
pub async fn delete_profile_handler(
    State(app_state): State<AppState>,
    current_user: CurrentUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Notice>>, AppError> {
    let user = current_user.require("delete your profile")?;

    if !delete_user(&app_state.sqlite_provider.db, user.id).await? {
        return Err(AppError::NotFound("User not found.".to_string()));
    }

    info!(user_id = user.id, "Profile deleted.");
    let notice = Notice::new("Your profile has been deleted successfully.").redirect_to("/");
    Ok(wrap_response(notice, debug_params, None))
}
