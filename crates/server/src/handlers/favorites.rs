use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::auth::CurrentUser;
use bookrec::personal::{add_favorite, remove_favorite, AddFavoriteOutcome, RemoveFavoriteOutcome};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

/// The result of a favorites change, with the message to show.
#[derive(Debug, Serialize)]
pub struct FavoriteChange<O> {
    pub outcome: O,
    pub message: String,
    pub redirect: &'static str,
}

/// The handler for `POST /add_to_favorites/{title}`.
pub async fn add_favorite_handler(
    State(app_state): State<AppState>,
    current_user: CurrentUser,
    Path(title): Path<String>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<FavoriteChange<AddFavoriteOutcome>>>, AppError> {
    let user = current_user.require("add favorites")?;

    let outcome = add_favorite(&app_state.sqlite_provider.db, user.id, &title).await?;
    let message = match outcome {
        AddFavoriteOutcome::Added => format!("'{title}' added to favorites!"),
        AddFavoriteOutcome::AlreadyExists => format!("'{title}' is already in your favorites."),
    };

    let change = FavoriteChange {
        outcome,
        message,
        redirect: "/profile",
    };
    Ok(wrap_response(change, debug_params, None))
}

/// The handler for `POST /remove_from_favorites/{title}`.
pub async fn remove_favorite_handler(
    State(app_state): State<AppState>,
    current_user: CurrentUser,
    Path(title): Path<String>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<FavoriteChange<RemoveFavoriteOutcome>>>, AppError> {
    let user = current_user.require("remove favorites")?;

    let outcome = remove_favorite(&app_state.sqlite_provider.db, user.id, &title).await?;
    let message = match outcome {
        RemoveFavoriteOutcome::Removed => format!("'{title}' removed from favorites!"),
        RemoveFavoriteOutcome::NotFound => format!("'{title}' is not in your favorites."),
    };

    let change = FavoriteChange {
        outcome,
        message,
        redirect: "/profile",
    };
    Ok(wrap_response(change, debug_params, None))
}
