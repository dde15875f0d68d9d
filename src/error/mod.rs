use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{dtos::ErrorBody, store};

/// Errors a handler can answer with. Each one maps to a status code and a
/// fixed message; the underlying cause is only logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("No tweet found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    OperationFailed {
        message: &'static str,
        #[source]
        source: store::Error,
    },

    #[error("Internal server error")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateUsername | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidCredentials | Self::NotFound => StatusCode::NOT_FOUND,
            Self::OperationFailed { .. } | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::OperationFailed { message, source } => {
                tracing::error!(error = %source, "{}", message);
            }
            Self::Task(err) => {
                tracing::error!(error = %err, "blocking task failed");
            }
            _ => {}
        }

        let status = self.status_code();
        if let Self::Unauthorized = self {
            return (status, "Unauthorized").into_response();
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(%rejection, "rejected request body");
        Self::BadRequest("Invalid request body".into())
    }
}

impl store::Error {
    /// Maps the error for a handler: domain errors keep their meaning,
    /// backend failures become a 500 carrying `message`.
    pub fn or_failed(self, message: &'static str) -> AppError {
        match self {
            Self::DuplicateUsername => AppError::DuplicateUsername,
            Self::InvalidCredentials => AppError::InvalidCredentials,
            Self::NotFound => AppError::NotFound,
            source => AppError::OperationFailed { message, source },
        }
    }
}

pub trait ResultExt<T> {
    /// Like `?`, but a backend failure answers with `message`.
    fn or_failed(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, store::Error> {
    fn or_failed(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|err| err.or_failed(message))
    }
}
