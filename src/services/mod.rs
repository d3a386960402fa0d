// src/services/mod.rs

//! Upstream API clients, the enrichment pipeline and the grading engine.

pub mod context;
pub mod dictionary;
pub mod enrichment;
pub mod image;
pub mod scoring;
pub mod trivia;

use std::time::Duration;

use reqwest::Client;

use crate::error::QuizError;

/// Builds the HTTP client shared by every upstream source.
/// `timeout` bounds the whole request; connecting gets half of it.
pub fn http_client(timeout: Duration) -> Result<Client, QuizError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout / 2)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| QuizError::SourceUnavailable(format!("failed to build HTTP client: {e}")))
}
