// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::{PublicQuestion, Question};

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizHeader {
    pub id: i64,
    pub title: String,
    pub created_by: Option<i64>,
    pub created_at: chrono::NaiveDateTime,
}

/// A quiz with its questions in persisted order.
#[derive(Debug, Clone, Serialize)]
pub struct Quiz {
    #[serde(flatten)]
    pub header: QuizHeader,
    pub questions: Vec<Question>,
}

/// DTO for playing a quiz: answers hidden, options shuffled per request.
#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub id: i64,
    pub title: String,
    pub questions: Vec<PublicQuestion>,
}

/// A quiz as seen by one user on their quiz list.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct QuizStanding {
    pub id: i64,
    pub title: String,
    /// The user's best score, or 0 if never attempted.
    pub user_score: f64,
    /// The user's competition rank, or 0 if never attempted.
    pub rank: i64,
    pub total_attempts: i64,
    pub high_score: f64,
}

/// DTO for building a quiz from the trivia source.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Trivia category id; 0 means any category.
    #[serde(default)]
    pub category: u32,

    #[serde(default)]
    #[validate(custom(function = validate_difficulty))]
    pub difficulty: String,

    #[serde(alias = "questionCount")]
    #[validate(range(min = 1, max = crate::config::MAX_QUESTION_COUNT))]
    pub question_count: u64,
}

fn validate_difficulty(difficulty: &str) -> Result<(), validator::ValidationError> {
    match difficulty.to_lowercase().as_str() {
        "" | "easy" | "medium" | "hard" => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_difficulty")),
    }
}

/// DTO for submitting answers, positionally aligned with the quiz's questions.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default)]
    pub answers: Vec<String>,
}
