//! Error types for the web server.
//!
//! Anything the user can fix (bad form input, unknown ids, wrong password)
//! is a flash message and never reaches this type. A `WebError` means the
//! request could not be served at all.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tally_db::DbError;
use tracing::error;

use crate::views;

/// Fatal request errors.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("Session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Invalid header value: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

impl From<argon2::password_hash::Error> for WebError {
    fn from(err: argon2::password_hash::Error) -> Self {
        WebError::PasswordHash(err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");

        (StatusCode::INTERNAL_SERVER_ERROR, Html(views::error_page())).into_response()
    }
}

/// Result type for request handling.
pub type WebResult<T> = Result<T, WebError>;
