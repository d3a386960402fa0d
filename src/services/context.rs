// src/services/context.rs

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{error::QuizError, models::trivia::WikiSummary};

/// Supplies a short contextual paragraph for a topic.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn summary(&self, topic: &str) -> Result<String, QuizError>;
}

/// Wikipedia REST `page/summary` endpoint.
pub struct WikiContextSource {
    client: Client,
    base_url: String,
}

impl WikiContextSource {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// `<base>/<percent-encoded topic>`.
    fn summary_url(&self, topic: &str) -> Result<Url, QuizError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| QuizError::SourceUnavailable(format!("invalid wiki base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| QuizError::SourceUnavailable("wiki base URL cannot take a path".into()))?
            .pop_if_empty()
            .push(topic);
        Ok(url)
    }
}

#[async_trait]
impl ContextSource for WikiContextSource {
    async fn summary(&self, topic: &str) -> Result<String, QuizError> {
        let url = self.summary_url(topic)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(QuizError::SourceUnavailable(format!(
                "wiki API returned status: {}",
                response.status()
            )));
        }

        let summary: WikiSummary = response
            .json()
            .await
            .map_err(|e| QuizError::SourceDataError(format!("failed to decode wiki summary: {e}")))?;

        Ok(summary.extract)
    }
}
