//! # SQLite Specific SQL Queries
//!
//! This module centralizes SQL query strings for the SQLite provider.
//! This makes the core logic cleaner and isolates database-specific syntax.

/// SQL to create the `users` table.
pub const CREATE_USERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    );
";

/// SQL to create the `favorites` table. Duplicates are prevented by the
/// application (lookup before insert), not by a constraint.
pub const CREATE_FAVORITES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS favorites (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        book_title TEXT NOT NULL
    );
";

/// SQL to create the append-only `user_searches` log.
pub const CREATE_USER_SEARCHES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS user_searches (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        search_query TEXT NOT NULL
    );
";

pub const CREATE_FAVORITES_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_favorites_user_id ON favorites (user_id);";

pub const CREATE_USER_SEARCHES_USER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_user_searches_user_id ON user_searches (user_id);";

/// Every statement needed to bring an empty database up to the current schema,
/// in dependency order.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_USERS_TABLE,
    CREATE_FAVORITES_TABLE,
    CREATE_USER_SEARCHES_TABLE,
    CREATE_FAVORITES_USER_INDEX,
    CREATE_USER_SEARCHES_USER_INDEX,
];
