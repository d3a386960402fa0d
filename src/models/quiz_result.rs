// src/models/quiz_result.rs

use serde::Serialize;
use sqlx::FromRow;

/// Per-quiz leaderboard row, ranked within its quiz.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub username: String,
    pub quiz_name: String,
    pub score: f64,
}

/// Global standing by average best score.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopScore {
    pub rank: i64,
    pub username: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub quizzes_taken: i64,
    pub average_score: f64,
    /// 0 when the user has no results yet.
    pub global_rank: i64,
}

/// How one question of a submission was graded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBreakdown {
    pub question_id: i64,
    pub text: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Result of grading a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
    /// Percentage in 0..=100.
    pub score: f64,
    pub correct_count: usize,
    pub total_count: usize,
    pub breakdown: Vec<QuestionBreakdown>,
    /// Competition rank of the caller's best score, 0 if unavailable.
    pub rank: i64,
}
