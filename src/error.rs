//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing or malformed when creating or updating a
    /// transaction.
    ///
    /// The string is a human readable message that is safe to show to the client.
    #[error("{0}")]
    Validation(String),

    /// The requested transaction does not exist.
    #[error("Transaction not found")]
    NotFound,

    /// The transaction exists but is owned by a different user.
    #[error("User not authorized")]
    Unauthorized,

    /// The request did not carry a valid session cookie.
    #[error("Not authorized, no valid session")]
    InvalidCredentials,

    /// An unhandled/unexpected SQL error.
    ///
    /// The inner error should only be logged on the server, clients receive a
    /// generic message.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Unauthorized | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::SqlError(_) | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match &self {
            Error::Validation(_)
            | Error::NotFound
            | Error::Unauthorized
            | Error::InvalidCredentials => self.to_string(),
            // Store failures are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                "Something went wrong, check the server logs for more details.".to_owned()
            }
        };

        (status_code, Json(json!({ "message": message }))).into_response()
    }
}
