use crate::services::media_library::LibraryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

/// A lightweight wrapper for request errors that keeps the message local.
///
/// Responses carry only a short plain-text body; storage and database
/// failures are logged server-side and collapsed into a generic 500.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::VideoNotFound(_) => {
                AppError::new(StatusCode::NOT_FOUND, "Video not found")
            }
            LibraryError::UnsupportedMediaType(_) => {
                AppError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
            }
            LibraryError::MissingField(_) => AppError::bad_request("All fields are required."),
            LibraryError::Sqlx(_) | LibraryError::Io(_) => {
                tracing::error!("request failed: {err}");
                AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
            }
        }
    }
}
