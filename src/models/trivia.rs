// src/models/trivia.rs

//! Wire records for the upstream trivia, encyclopedia and dictionary APIs.

use serde::{Deserialize, Serialize};

/// A category offered by the trivia source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaCategory {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryResponse {
    pub trivia_categories: Vec<TriviaCategory>,
}

/// A question exactly as the trivia source returns it (possibly base64 or
/// entity-encoded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub category: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TriviaResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

/// A trivia question after text normalization and enrichment.
/// Transient: the store persists it as a [`crate::models::question::NewQuestion`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedQuestion {
    pub category: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub image_url: String,
    /// Empty when the context fetch failed under the degrade policy.
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct WikiSummary {
    #[serde(default)]
    pub extract: String,
}

/// One dictionary entry for a word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}
