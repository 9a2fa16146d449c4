use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures raised by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Outcomes surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed request body: {0}")]
    MalformedInput(String),

    #[error("Only POST requests are accepted")]
    MethodNotAllowed,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    PersistenceFailure(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
