use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookrec::StoreError;
use core_access::CoreAccessError;
use serde_json::json;
use tracing::{error, info};

/// Where clients are sent when a route needs a signed-in user.
pub const LOGIN_REDIRECT: &str = "/login";

/// A custom error type for the server application.
///
/// Most variants are user-facing outcomes (bad input, not logged in, nothing
/// found) that carry the message to show. Only `Store`, `Access` and
/// `Internal` are actual faults.
pub enum AppError {
    /// Errors from the favorites and search history stores.
    Store(StoreError),
    /// Errors from the account store.
    Access(CoreAccessError),
    BadRequest(String),
    /// The request carried credentials or a token that did not check out.
    Unauthorized(String),
    /// The route needs a signed-in user and none was present.
    LoginRequired(String),
    NotFound(String),
    Conflict(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<CoreAccessError> for AppError {
    fn from(err: CoreAccessError) -> Self {
        AppError::Access(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Store(err) => {
                error!("StoreError: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
            AppError::Access(err) => {
                error!("CoreAccessError: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
            AppError::LoginRequired(msg) => {
                info!("Login required: {msg}");
                let body = Json(json!({ "error": msg, "redirect": LOGIN_REDIRECT }));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
