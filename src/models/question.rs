// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

use crate::models::trivia::EnrichedQuestion;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub quiz_id: i64,

    /// The prompt shown to the player.
    pub text: String,

    /// All answer options, correct one included.
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// The correct answer, byte-identical to exactly one entry of `options`.
    pub answer: String,

    pub image_url: Option<String>,

    /// Encyclopedia summary for the question's category.
    pub context: Option<String>,
}

/// DTO for sending a question to the player (excludes the answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub text: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            text: q.text,
            options: q.options.0,
            image_url: q.image_url,
            context: q.context,
        }
    }
}

/// A question about to be inserted by `store::quiz::create_quiz`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
    pub image_url: Option<String>,
    pub context: Option<String>,
}

impl NewQuestion {
    /// Builds a question whose options hold exactly one copy of `answer`.
    ///
    /// The correct answer goes first; incorrect answers that duplicate it are dropped.
    pub fn new(
        text: String,
        answer: String,
        incorrect: Vec<String>,
        image_url: Option<String>,
        context: Option<String>,
    ) -> Self {
        let mut options = Vec::with_capacity(incorrect.len() + 1);
        options.push(answer.clone());
        options.extend(incorrect.into_iter().filter(|opt| *opt != answer));

        Self {
            text,
            options,
            answer,
            image_url,
            context,
        }
    }
}

impl From<EnrichedQuestion> for NewQuestion {
    fn from(q: EnrichedQuestion) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        NewQuestion::new(
            q.question,
            q.correct_answer,
            q.incorrect_answers,
            non_empty(q.image_url),
            non_empty(q.context),
        )
    }
}

/// Answer key row used by grading, in persisted (ascending id) order.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerKey {
    pub id: i64,
    pub text: String,
    pub answer: String,
}
