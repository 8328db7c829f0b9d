//! # Book Recommendations
//!
//! This crate provides the recommendation core of `bookrec`: the static
//! catalog of precomputed tables, the similarity ranker built on it, and the
//! per-user favorites and search history stored in SQLite.

pub mod catalog;
pub mod constants;
pub mod errors;
pub mod personal;
pub mod providers;
pub mod ranking;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use errors::StoreError;
pub use ranking::{recommend_by_title, recommend_personalized, score_history, Recommendations};
pub use types::{Book, PopularBook, RecommendedBook};
