//! # Recommendation Handlers
//!
//! Single-title recommendations for anyone, and history-based
//! recommendations for signed-in users.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::auth::{CurrentUser, OptionalUser};
use bookrec::{
    personal::{recent_searches, record_search},
    recommend_by_title, recommend_personalized, Recommendations, RecommendedBook,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub user_input: String,
}

/// The handler for `POST /recommend_books`.
///
/// A successful lookup by a signed-in user is appended to their search
/// history. Anonymous lookups, lookups with a stale token and lookups with
/// no match leave no trace.
pub async fn recommend_books_handler(
    State(app_state): State<AppState>,
    current_user: OptionalUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<RecommendRequest>,
) -> Result<Json<ApiResponse<Vec<RecommendedBook>>>, AppError> {
    let user_input = payload.user_input.trim();
    if user_input.is_empty() {
        return Err(AppError::BadRequest(
            "Please enter a book title to get recommendations.".to_string(),
        ));
    }

    let books = match recommend_by_title(&app_state.catalog, user_input) {
        Recommendations::NotFound => {
            info!(user_input, "No title matched the recommendation query.");
            return Err(AppError::NotFound(
                "No recommendations found for the given book title.".to_string(),
            ));
        }
        Recommendations::Ranked(books) => books,
    };

    let logged = if let Some(user) = current_user.0 {
        record_search(&app_state.sqlite_provider.db, user.id, user_input).await?;
        true
    } else {
        false
    };

    info!(user_input, count = books.len(), "Served recommendations.");
    let debug_info = json!({ "query": user_input, "search_logged": logged });
    Ok(wrap_response(books, debug_params, Some(debug_info)))
}

/// The handler for `GET /personalized`.
pub async fn personalized_handler(
    State(app_state): State<AppState>,
    current_user: CurrentUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Vec<RecommendedBook>>>, AppError> {
    let user = current_user.require("view personalized recommendations")?;

    let history = recent_searches(&app_state.sqlite_provider.db, user.id).await?;
    let books = recommend_personalized(&app_state.catalog, &history);

    info!(
        user_id = user.id,
        searches = history.len(),
        count = books.len(),
        "Served personalized recommendations."
    );
    let debug_info = json!({ "history": history });
    Ok(wrap_response(books, debug_params, Some(debug_info)))
}
