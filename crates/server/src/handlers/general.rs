//! # General Route Handlers
//!
//! The health check and the landing list of popular books.

use super::{wrap_response, ApiResponse, AppState, DebugParams};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A popular book as shown on the landing page.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PopularBookView {
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub num_ratings: u64,
    pub avg_rating: f64,
    /// Absent when the book has no row in the book table.
    pub isbn: Option<String>,
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for the root (`/`) endpoint: the popular books list.
pub async fn popular_books_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
) -> Json<ApiResponse<Vec<PopularBookView>>> {
    let catalog = &app_state.catalog;
    let placeholder = &app_state.config.placeholder_image_url;

    let books: Vec<PopularBookView> = catalog
        .popular()
        .iter()
        .map(|book| PopularBookView {
            title: book.title.clone(),
            author: book.author.clone(),
            image_url: book
                .image_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| placeholder.clone()),
            num_ratings: book.num_ratings,
            avg_rating: book.avg_rating,
            isbn: catalog.listing_isbn_for(&book.title).map(str::to_string),
        })
        .collect();

    let debug_info = json!({ "catalog_titles": catalog.len(), "popular": books.len() });
    wrap_response(books, debug_params, Some(debug_info))
}
