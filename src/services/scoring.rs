// src/services/scoring.rs

use sqlx::SqlitePool;

use crate::{
    error::QuizError,
    models::{
        question::AnswerKey,
        quiz_result::{GradeOutcome, QuestionBreakdown},
    },
    store,
};

/// Grading of one submission before it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub score: f64,
    pub correct_count: usize,
    pub total_count: usize,
    pub breakdown: Vec<QuestionBreakdown>,
}

/// Pairs answers with questions by position and scores them.
///
/// Missing trailing answers count as empty (incorrect); extra answers are
/// ignored. Answers must match byte-for-byte.
pub fn grade(quiz_id: i64, keys: &[AnswerKey], answers: &[String]) -> Result<Grade, QuizError> {
    if keys.is_empty() {
        return Err(QuizError::EmptyQuiz(quiz_id));
    }

    let breakdown: Vec<QuestionBreakdown> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let user_answer = answers.get(i).cloned().unwrap_or_default();
            QuestionBreakdown {
                question_id: key.id,
                text: key.text.clone(),
                is_correct: user_answer == key.answer,
                user_answer,
                correct_answer: key.answer.clone(),
            }
        })
        .collect();

    let correct_count = breakdown.iter().filter(|b| b.is_correct).count();
    let total_count = breakdown.len();
    let score = correct_count as f64 / total_count as f64 * 100.0;

    Ok(Grade {
        score,
        correct_count,
        total_count,
        breakdown,
    })
}

/// Grades a submission, keeps the user's best score and reports their rank.
///
/// Grading reads straight from the pool. The upsert and the rank lookup share
/// one transaction so the rank reflects the score just written. The upsert
/// must stay its first statement: a deferred SQLite transaction that reads
/// first gets `SQLITE_BUSY` on upgrade under concurrent writers.
pub async fn grade_submission(
    pool: &SqlitePool,
    quiz_id: i64,
    user_id: i64,
    answers: &[String],
) -> Result<GradeOutcome, QuizError> {
    if store::quiz::find_header(pool, quiz_id).await?.is_none() {
        return Err(QuizError::NotFound(format!("quiz {quiz_id}")));
    }

    let keys = store::quiz::answer_keys(pool, quiz_id).await?;
    let grade = grade(quiz_id, &keys, answers)?;

    let mut tx = pool.begin().await?;
    let raised = store::result::upsert_result(&mut *tx, user_id, quiz_id, grade.score).await?;
    let rank = store::result::quiz_rank(&mut *tx, quiz_id, user_id)
        .await?
        .unwrap_or_else(|| {
            tracing::warn!(quiz_id, user_id, "No rank row after upsert; reporting 0");
            0
        });

    tx.commit().await?;

    tracing::info!(
        quiz_id,
        user_id,
        score = grade.score,
        correct = grade.correct_count,
        total = grade.total_count,
        rank,
        raised,
        "Graded submission"
    );

    Ok(GradeOutcome {
        score: grade.score,
        correct_count: grade.correct_count,
        total_count: grade.total_count,
        breakdown: grade.breakdown,
        rank,
    })
}
