//! # Favorites
//!
//! A user's saved book titles. Duplicates are prevented by looking up the
//! pair before inserting, and both add and remove report informational
//! outcomes instead of failing.

use crate::errors::StoreError;
use serde::Serialize;
use tracing::info;
use turso::{params, Database};

/// Result of adding a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddFavoriteOutcome {
    Added,
    AlreadyExists,
}

/// Result of removing a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveFavoriteOutcome {
    Removed,
    NotFound,
}

async fn find_favorite_id(
    conn: &turso::Connection,
    user_id: i64,
    book_title: &str,
) -> Result<Option<i64>, StoreError> {
    let mut rows = conn
        .query(
            "SELECT id FROM favorites WHERE user_id = ? AND book_title = ? LIMIT 1",
            params![user_id, book_title],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Ok(None),
    }
}

/// Adds `book_title` to the user's favorites unless it is already there.
pub async fn add_favorite(
    db: &Database,
    user_id: i64,
    book_title: &str,
) -> Result<AddFavoriteOutcome, StoreError> {
    let conn = db.connect()?;
    if find_favorite_id(&conn, user_id, book_title).await?.is_some() {
        info!(user_id, book_title, "Favorite already present.");
        return Ok(AddFavoriteOutcome::AlreadyExists);
    }

    conn.execute(
        "INSERT INTO favorites (user_id, book_title) VALUES (?, ?)",
        params![user_id, book_title],
    )
    .await?;
    info!(user_id, book_title, "Favorite added.");
    Ok(AddFavoriteOutcome::Added)
}

/// Removes one matching favorite row, if present.
pub async fn remove_favorite(
    db: &Database,
    user_id: i64,
    book_title: &str,
) -> Result<RemoveFavoriteOutcome, StoreError> {
    let conn = db.connect()?;
    let Some(id) = find_favorite_id(&conn, user_id, book_title).await? else {
        return Ok(RemoveFavoriteOutcome::NotFound);
    };

    conn.execute("DELETE FROM favorites WHERE id = ?", params![id])
        .await?;
    info!(user_id, book_title, "Favorite removed.");
    Ok(RemoveFavoriteOutcome::Removed)
}

/// Lists the user's favorite titles in the order they were added.
pub async fn list_favorites(db: &Database, user_id: i64) -> Result<Vec<String>, StoreError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            "SELECT book_title FROM favorites WHERE user_id = ? ORDER BY id ASC",
            params![user_id],
        )
        .await?;

    let mut titles: Vec<String> = Vec::new();
    while let Some(row) = rows.next().await? {
        titles.push(row.get(0)?);
    }
    Ok(titles)
}
