// src/services/dictionary.rs

use reqwest::{Client, StatusCode};
use url::Url;

use crate::{error::QuizError, models::trivia::DictionaryEntry};

/// Client for a free-dictionary style API (`<base>/<word>` → `[entry, ...]`).
pub struct DictionaryClient {
    client: Client,
    base_url: String,
}

impl DictionaryClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Looks up the first dictionary entry for `word`.
    pub async fn define(&self, word: &str) -> Result<DictionaryEntry, QuizError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            QuizError::SourceUnavailable(format!("invalid dictionary base URL: {e}"))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                QuizError::SourceUnavailable("dictionary base URL cannot take a path".into())
            })?
            .pop_if_empty()
            .push(word);

        let response = self.client.get(url).send().await?;

        // The API answers unknown words with 404 and a JSON message body.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(QuizError::NotFound(format!("definition for '{word}'")));
        }
        if !response.status().is_success() {
            return Err(QuizError::SourceUnavailable(format!(
                "dictionary API returned status: {}",
                response.status()
            )));
        }

        let entries: Vec<DictionaryEntry> = response.json().await.map_err(|e| {
            QuizError::SourceDataError(format!("failed to decode definitions: {e}"))
        })?;

        entries
            .into_iter()
            .next()
            .ok_or_else(|| QuizError::NotFound(format!("definition for '{word}'")))
    }
}
