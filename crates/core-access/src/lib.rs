//! # Core Access Crate
//!
//! This crate is the central authority for account identity in `bookrec`:
//! registering users, checking their credentials, and removing an account
//! together with everything it owns.

pub mod password;

pub use password::{hash_password, verify_password};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use turso::{Connection, Database, Error as TursoError, Row, params};

/// Tables holding rows that belong to a user, in the order they must be
/// emptied before the user row itself can go.
pub const USER_OWNED_TABLES: &[&str] = &["favorites", "user_searches"];

#[derive(Error, Debug)]
pub enum CoreAccessError {
    #[error("Database error: {0}")]
    Database(#[from] TursoError),
    #[error("Failed to create or find user: {0}")]
    UserPersistenceFailed(String),
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Represents a registered user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl TryFrom<&Row> for User {
    type Error = CoreAccessError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
        })
    }
}

/// The outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Created(User),
    /// The username is already in use. Usernames compare case-sensitively.
    UsernameTaken,
}

/// Finds a user by exact username.
pub async fn find_user_by_username(
    db: &Database,
    username: &str,
) -> Result<Option<User>, CoreAccessError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            "SELECT id, username, password FROM users WHERE username = ?",
            params![username],
        )
        .await?;
    rows.next()
        .await?
        .map(|row| User::try_from(&row))
        .transpose()
}

/// Finds a user by id.
pub async fn find_user_by_id(db: &Database, user_id: i64) -> Result<Option<User>, CoreAccessError> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(
            "SELECT id, username, password FROM users WHERE id = ?",
            params![user_id],
        )
        .await?;
    rows.next()
        .await?
        .map(|row| User::try_from(&row))
        .transpose()
}

/// Registers a new user with a salted hash of `password`.
///
/// A taken username is reported as `Registration::UsernameTaken`, including
/// when a concurrent registration wins the race to the unique index.
pub async fn register_user(
    db: &Database,
    username: &str,
    password: &str,
) -> Result<Registration, CoreAccessError> {
    if find_user_by_username(db, username).await?.is_some() {
        info!(username, "Registration rejected: username already exists.");
        return Ok(Registration::UsernameTaken);
    }

    let password_hash = hash_password(password)?;
    let conn = db.connect()?;
    match conn
        .execute(
            "INSERT INTO users (username, password) VALUES (?, ?)",
            params![username, password_hash],
        )
        .await
    {
        Ok(_) => {}
        Err(TursoError::SqlExecutionFailure(msg)) if msg.contains("UNIQUE constraint failed") => {
            warn!(username, "Lost a registration race on the username index.");
            return Ok(Registration::UsernameTaken);
        }
        Err(e) => return Err(e.into()),
    }

    let user = find_user_by_username(db, username)
        .await?
        .ok_or_else(|| CoreAccessError::UserPersistenceFailed(username.to_string()))?;
    info!(user_id = user.id, username, "Registered new user.");
    Ok(Registration::Created(user))
}

/// Checks a username/password pair.
///
/// Returns `Ok(None)` for an unknown user or a wrong password. An unknown
/// username still pays for one hash so both failures cost about the same.
pub async fn authenticate(
    db: &Database,
    username: &str,
    password: &str,
) -> Result<Option<User>, CoreAccessError> {
    let Some(user) = find_user_by_username(db, username).await? else {
        hash_password(password)?;
        debug!(username, "Login attempt for unknown user.");
        return Ok(None);
    };

    if verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        debug!(username, "Login attempt with wrong password.");
        Ok(None)
    }
}

/// Deletes a user and all rows they own, in one transaction.
///
/// Rows in `USER_OWNED_TABLES` are removed first, in order, then the user
/// row. Returns whether a user row existed.
pub async fn delete_user(db: &Database, user_id: i64) -> Result<bool, CoreAccessError> {
    let conn = db.connect()?;
    conn.execute("BEGIN TRANSACTION", ()).await?;

    match delete_user_rows(&conn, user_id).await {
        Ok(existed) => {
            conn.execute("COMMIT", ()).await?;
            info!(user_id, existed, "Deleted user account.");
            Ok(existed)
        }
        Err(e) => {
            if let Err(rollback_err) = conn.execute("ROLLBACK", ()).await {
                error!(user_id, "Failed to roll back account deletion: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn delete_user_rows(conn: &Connection, user_id: i64) -> Result<bool, CoreAccessError> {
    for table in USER_OWNED_TABLES {
        let removed = conn
            .execute(
                &format!("DELETE FROM {table} WHERE user_id = ?"),
                params![user_id],
            )
            .await?;
        debug!(user_id, table, removed, "Removed user-owned rows.");
    }

    let removed = conn
        .execute("DELETE FROM users WHERE id = ?", params![user_id])
        .await?;
    Ok(removed > 0)
}
