// src/services/trivia.rs

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::QuizError,
    models::trivia::{CategoryResponse, RawQuestion, TriviaCategory, TriviaResponse},
};

/// Where raw trivia questions come from.
#[async_trait]
pub trait TriviaSource: Send + Sync {
    /// Fetches `amount` questions. `category` 0 and an empty `difficulty` mean "any".
    async fn fetch_questions(
        &self,
        category: u32,
        difficulty: &str,
        amount: u64,
    ) -> Result<Vec<RawQuestion>, QuizError>;

    async fn fetch_categories(&self) -> Result<Vec<TriviaCategory>, QuizError>;
}

/// Open Trivia DB style HTTP API.
pub struct HttpTriviaSource {
    client: Client,
    questions_url: String,
    categories_url: String,
}

impl HttpTriviaSource {
    pub fn new(client: Client, questions_url: String, categories_url: String) -> Self {
        Self {
            client,
            questions_url,
            categories_url,
        }
    }
}

#[async_trait]
impl TriviaSource for HttpTriviaSource {
    async fn fetch_questions(
        &self,
        category: u32,
        difficulty: &str,
        amount: u64,
    ) -> Result<Vec<RawQuestion>, QuizError> {
        let mut params = vec![("amount", amount.to_string())];
        if category > 0 {
            params.push(("category", category.to_string()));
        }
        if !difficulty.is_empty() {
            params.push(("difficulty", difficulty.to_lowercase()));
        }

        tracing::debug!(amount, category, difficulty, "Fetching trivia questions");

        let response = self
            .client
            .get(&self.questions_url)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuizError::SourceUnavailable(format!(
                "trivia API returned status: {}",
                response.status()
            )));
        }

        let body: TriviaResponse = response
            .json()
            .await
            .map_err(|e| QuizError::SourceDataError(format!("failed to decode questions: {e}")))?;

        if body.response_code != 0 {
            return Err(QuizError::SourceUnavailable(format!(
                "trivia API error: response code {}",
                body.response_code
            )));
        }

        if body.results.is_empty() {
            return Err(QuizError::SourceDataError(
                "trivia API returned no questions".to_string(),
            ));
        }

        Ok(body.results)
    }

    async fn fetch_categories(&self) -> Result<Vec<TriviaCategory>, QuizError> {
        let response = self.client.get(&self.categories_url).send().await?;

        if !response.status().is_success() {
            return Err(QuizError::SourceUnavailable(format!(
                "category API returned status: {}",
                response.status()
            )));
        }

        let body: CategoryResponse = response
            .json()
            .await
            .map_err(|e| QuizError::SourceDataError(format!("failed to decode categories: {e}")))?;

        Ok(body.trivia_categories)
    }
}
