//! # Authentication Extractor
//!
//! This module provides the Axum extractors for JWT-based sessions. A
//! `CurrentUser` resolves as follows:
//! 1.  **No Token Present**: Resolves to an anonymous caller (`None`).
//! 2.  **Valid Token Present**: Resolves to the signed-in user.
//! 3.  **Invalid/Expired Token Present**: Rejects the request with a `401 Unauthorized`.
//!
//! Routes that need a signed-in user call `CurrentUser::require`, which turns
//! an anonymous caller into the route's "Please log in" response. Routes that
//! also serve anonymous callers take `OptionalUser` instead, which treats an
//! invalid token like no token at all.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use core_access::find_user_by_id;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::json;
use tracing::{debug, error, warn};

use super::token::Claims;
use crate::{errors::AppError, state::AppState};

const INVALID_TOKEN: &str = "Invalid or expired token.";

/// The identity behind a valid session token.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// The caller of the current request, if signed in.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionUser>);

impl CurrentUser {
    /// Returns the signed-in user, or asks the client to log in to `action`.
    pub fn require(self, action: &str) -> Result<SessionUser, AppError> {
        self.0
            .ok_or_else(|| AppError::LoginRequired(format!("Please log in to {action}.")))
    }
}

/// The caller of an open route, if signed in.
///
/// A missing, expired or otherwise invalid token all resolve to `None`, so a
/// stale session never blocks a route that works anonymously.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<SessionUser>);

/// A custom rejection type for authentication failures.
///
/// This allows the `FromRequestParts` implementation to return a specific
/// HTTP status code and error message, which Axum then turns into a response.
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_session(parts, state).await.map(CurrentUser)
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_session(parts, state).await {
            Ok(user) => Ok(OptionalUser(user)),
            Err(AuthError(status, msg)) if status == StatusCode::UNAUTHORIZED => {
                warn!("Ignoring stale session on an open route: {msg}");
                Ok(OptionalUser(None))
            }
            Err(e) => Err(e),
        }
    }
}

async fn resolve_session(
    parts: &mut Parts,
    state: &AppState,
) -> Result<Option<SessionUser>, AuthError> {
    let bearer_header =
        Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                warn!("Unexpected error during header extraction: {}", e);
                AuthError(
                    StatusCode::BAD_REQUEST,
                    "Invalid Authorization header format.".to_string(),
                )
            })?;

    let Some(TypedHeader(Authorization(bearer))) = bearer_header else {
        debug!("No Authorization header found, continuing anonymously.");
        return Ok(None);
    };

    let token_data = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("JWT validation failed: {}", e);
        AuthError(StatusCode::UNAUTHORIZED, INVALID_TOKEN.to_string())
    })?;

    // Tokens outlive deleted accounts, so the user row must still exist.
    let user = find_user_by_id(&state.sqlite_provider.db, token_data.claims.user_id)
        .await
        .map_err(|e| {
            error!("Failed to look up session user: {}", e);
            AuthError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.".to_string(),
            )
        })?
        .ok_or_else(|| {
            warn!(
                user_id = token_data.claims.user_id,
                "Token refers to a user that no longer exists."
            );
            AuthError(StatusCode::UNAUTHORIZED, INVALID_TOKEN.to_string())
        })?;

    Ok(Some(SessionUser {
        id: user.id,
        username: user.username,
    }))
}
