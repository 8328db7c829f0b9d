//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! multiple crates in the `bookrec` workspace. Using these constants helps to avoid
//! "magic strings" and ensures consistency.

/// The default path for the main application SQLite database.
pub const DEFAULT_DB_FILE: &str = "db/bookrec.db";

/// The default directory holding the precomputed catalog files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// The maximum number of books returned by any recommendation.
pub const RECOMMENDATION_LIMIT: usize = 10;

// Catalog file names inside the data directory.
pub const BOOKS_FILE: &str = "books.csv";
pub const POPULAR_FILE: &str = "popular.csv";
pub const PIVOT_FILE: &str = "pivot.csv";
pub const SIMILARITY_FILE: &str = "similarity.csv";
