//! Session tokens.
//!
//! A session is a signed HS256 JWT that carries the user's id and name. The
//! server keeps no session table, so logging out means the client drops its
//! token.

use chrono::Utc;
use core_access::User;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// Represents the claims we expect to find in the JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The username the token was issued to.
    pub sub: String,
    /// The user's database ID.
    pub user_id: i64,
    /// The expiration timestamp.
    pub exp: usize,
}

/// Signs a session token for `user` that expires after `ttl_secs`.
pub fn issue_token(
    secret: &str,
    user: &User,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (Utc::now().timestamp().max(0) as u64).saturating_add(ttl_secs);
    let claims = Claims {
        sub: user.username.clone(),
        user_id: user.id,
        exp: expiration as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}
