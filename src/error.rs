//! Error type shared by the store, the session layer and the HTTP handlers.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Group, member or config lookup came back empty
    #[error("{0} not found")]
    NotFound(String),

    /// Request failed validation before touching the store
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing, malformed or expired session token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid session without the privilege the operation needs
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Backing store is in a state it cannot serve from
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Storage(_) | Error::Io(_) | Error::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}
