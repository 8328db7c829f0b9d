use super::{AppError, AppState};
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::info;

/// Sends the client to the external catalog page for `title`.
pub async fn book_detail_handler(
    State(app_state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Redirect, AppError> {
    let isbn = app_state
        .catalog
        .isbn_for(&title)
        .ok_or_else(|| AppError::NotFound(format!("No book found with title '{title}'.")))?;

    let url = format!("{}{}", app_state.config.book_link_base, isbn);
    info!(title, url, "Redirecting to book detail page.");
    Ok(Redirect::to(&url))
}
