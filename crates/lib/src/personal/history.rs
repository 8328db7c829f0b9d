//! # Search History
//!
//! The append-only log of recommendation queries made by signed-in users.
//! It is the only input to personalized recommendations.

use crate::errors::StoreError;
use tracing::debug;
use turso::{params, Database};

/// Appends one raw query to the user's search history.
pub async fn record_search(db: &Database, user_id: i64, query: &str) -> Result<(), StoreError> {
    let conn = db.connect()?;
    conn.execute(
        "INSERT INTO user_searches (user_id, search_query) VALUES (?, ?)",
        params![user_id, query],
    )
    .await?;
    debug!(user_id, query, "Recorded search.");
    Ok(())
}

/// Returns the user's searches, most recent first.
pub async fn recent_searches(db: &Database, user_id: i64) -> Result<Vec<String>, StoreError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            "SELECT search_query FROM user_searches WHERE user_id = ? ORDER BY id DESC",
            params![user_id],
        )
        .await?;

    let mut searches: Vec<String> = Vec::new();
    while let Some(row) = rows.next().await? {
        searches.push(row.get(0)?);
    }
    Ok(searches)
}
