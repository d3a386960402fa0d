// src/handlers/dictionary.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, services::dictionary::DictionaryClient};

/// Looks up a word's definition.
pub async fn define_word(
    State(dictionary): State<Arc<DictionaryClient>>,
    Path(word): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let word = word.trim();
    if word.is_empty() || word.len() > 64 {
        return Err(AppError::BadRequest("Word must be 1-64 characters".to_string()));
    }

    let entry = dictionary.define(word).await?;
    Ok(Json(entry))
}
