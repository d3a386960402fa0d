// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Errors produced by the quiz core (sources, pipeline, store, scoring).
///
/// Handlers never build these directly; they bubble up with `?` and are
/// translated into [`AppError`] at the HTTP boundary.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Network failure or non-success indicator from an upstream API.
    #[error("upstream source unavailable: {0}")]
    SourceUnavailable(String),

    /// Upstream replied, but the payload was malformed or empty.
    #[error("upstream returned unusable data: {0}")]
    SourceDataError(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Grading was requested for a quiz that has no questions.
    #[error("quiz {0} has no questions")]
    EmptyQuiz(i64),

    /// Strict enrichment policy: at least one per-question task failed.
    #[error("{failed} of {total} questions failed enrichment")]
    Enrichment { failed: usize, total: usize },

    #[error("{0}")]
    Conflict(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            QuizError::SourceDataError(err.to_string())
        } else {
            QuizError::SourceUnavailable(err.to_string())
        }
    }
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate username)
    Conflict(String),

    // 422 Unprocessable Entity (e.g., grading an empty quiz)
    Unprocessable(String),

    // 502 Bad Gateway (upstream trivia/wiki/dictionary failures)
    BadGateway(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::BadGateway(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::SourceUnavailable(_)
            | QuizError::SourceDataError(_)
            | QuizError::Enrichment { .. } => AppError::BadGateway(err.to_string()),
            QuizError::NotFound(_) => AppError::NotFound(err.to_string()),
            QuizError::EmptyQuiz(_) => AppError::Unprocessable(err.to_string()),
            QuizError::Conflict(msg) => AppError::Conflict(msg),
            QuizError::Persistence(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}
