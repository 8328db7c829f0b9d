//! # Personal Data
//!
//! Per-user state kept in SQLite: favorite books and the search history
//! that feeds personalized recommendations.

pub mod favorites;
pub mod history;

pub use favorites::{
    add_favorite, list_favorites, remove_favorite, AddFavoriteOutcome, RemoveFavoriteOutcome,
};
pub use history::{recent_searches, record_search};
