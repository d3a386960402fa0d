// src/services/enrichment.rs

//! Builds a quiz from the trivia source: fetch a batch, normalize its text,
//! then enrich every question concurrently with an image and a context summary.

use std::{fmt, str::FromStr, sync::Arc};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::QuizError,
    models::trivia::{EnrichedQuestion, RawQuestion, TriviaCategory},
    services::{
        context::{ContextSource, WikiContextSource},
        http_client,
        image::PlaceholderImages,
        trivia::{HttpTriviaSource, TriviaSource},
    },
    utils::text::{is_base64_record, normalize_field},
};

/// What a failed per-question enrichment does to the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichmentPolicy {
    /// The question keeps an empty context; the batch succeeds.
    #[default]
    Degrade,
    /// Any failure fails the whole batch.
    Strict,
}

impl FromStr for EnrichmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown enrichment policy '{other}'")),
        }
    }
}

impl fmt::Display for EnrichmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrade => f.write_str("degrade"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

/// Per-question result of the fan-out.
#[derive(Debug)]
pub struct EnrichmentOutcome {
    pub question: EnrichedQuestion,
    /// Why the context could not be attached, if it could not.
    pub error: Option<QuizError>,
}

pub struct EnrichmentPipeline {
    trivia: Arc<dyn TriviaSource>,
    context: Arc<dyn ContextSource>,
    images: PlaceholderImages,
    policy: EnrichmentPolicy,
}

impl EnrichmentPipeline {
    pub fn new(
        trivia: Arc<dyn TriviaSource>,
        context: Arc<dyn ContextSource>,
        images: PlaceholderImages,
        policy: EnrichmentPolicy,
    ) -> Self {
        Self {
            trivia,
            context,
            images,
            policy,
        }
    }

    /// Wires the HTTP-backed sources described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, QuizError> {
        let client = http_client(config.http_timeout)?;
        let trivia = HttpTriviaSource::new(
            client.clone(),
            config.trivia_api_url.clone(),
            config.trivia_categories_url.clone(),
        );
        let context = WikiContextSource::new(client, config.wiki_api_url.clone());
        let images = PlaceholderImages::new(
            config.placeholder_image_url.clone(),
            config.image_cache_ttl,
        );

        Ok(Self::new(
            Arc::new(trivia),
            Arc::new(context),
            images,
            config.enrichment_policy,
        ))
    }

    pub fn policy(&self) -> EnrichmentPolicy {
        self.policy
    }

    pub fn images(&self) -> &PlaceholderImages {
        &self.images
    }

    pub async fn categories(&self) -> Result<Vec<TriviaCategory>, QuizError> {
        self.trivia.fetch_categories().await
    }

    /// Fetches `count` questions and returns them enriched, in source order.
    pub async fn build_quiz(
        &self,
        category: u32,
        difficulty: &str,
        count: u64,
    ) -> Result<Vec<EnrichedQuestion>, QuizError> {
        let raw = self
            .trivia
            .fetch_questions(category, difficulty, count)
            .await?;

        if raw.is_empty() {
            return Err(QuizError::SourceDataError(
                "trivia source returned no questions".to_string(),
            ));
        }

        let outcomes = self.enrich_all(raw.into_iter().map(normalize).collect()).await;
        let total = outcomes.len();
        let failed = outcomes.iter().filter(|o| o.error.is_some()).count();

        if failed > 0 {
            match self.policy {
                EnrichmentPolicy::Strict => {
                    warn!(failed, total, "Enrichment failed; rejecting batch");
                    return Err(QuizError::Enrichment { failed, total });
                }
                EnrichmentPolicy::Degrade => {
                    warn!(failed, total, "Enrichment failed; continuing without context");
                }
            }
        }

        info!(total, category, difficulty, "Built quiz questions");
        Ok(outcomes.into_iter().map(|o| o.question).collect())
    }

    /// Starts one task per question and waits for all of them.
    pub async fn enrich_all(&self, questions: Vec<EnrichedQuestion>) -> Vec<EnrichmentOutcome> {
        join_all(questions.into_iter().map(|q| self.enrich_one(q))).await
    }

    async fn enrich_one(&self, mut question: EnrichedQuestion) -> EnrichmentOutcome {
        question.image_url = self.images.image_for(&question.category).await;

        let error = match self.context.summary(&question.category).await {
            Ok(extract) => {
                question.context = extract;
                None
            }
            Err(e) => {
                debug!(category = %question.category, error = %e, "Context fetch failed");
                Some(e)
            }
        };

        EnrichmentOutcome { question, error }
    }
}

/// Decodes base64/entity-encoded text on every field of a raw question.
///
/// Base64 decoding applies to the whole record or not at all, keyed on the
/// prompt.
pub fn normalize(raw: RawQuestion) -> EnrichedQuestion {
    let encoded = is_base64_record(&raw.question);
    let field = |s: &str| normalize_field(s, encoded);

    EnrichedQuestion {
        category: field(&raw.category),
        difficulty: field(&raw.difficulty),
        question: field(&raw.question),
        correct_answer: field(&raw.correct_answer),
        incorrect_answers: raw.incorrect_answers.iter().map(|a| field(a)).collect(),
        image_url: String::new(),
        context: String::new(),
    }
}
