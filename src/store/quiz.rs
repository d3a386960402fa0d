// src/store/quiz.rs

use sqlx::{SqliteExecutor, SqlitePool, types::Json};

use crate::{
    error::QuizError,
    models::{
        question::{AnswerKey, NewQuestion, Question},
        quiz::{Quiz, QuizHeader, QuizStanding},
    },
};

/// Persists a quiz header and all of its questions, or nothing at all.
pub async fn create_quiz(
    pool: &SqlitePool,
    title: &str,
    created_by: i64,
    questions: &[NewQuestion],
) -> Result<i64, QuizError> {
    let mut tx = pool.begin().await?;

    let quiz_id: i64 =
        sqlx::query_scalar("INSERT INTO quizzes (title, created_by) VALUES (?, ?) RETURNING id")
            .bind(title)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (quiz_id, text, options, answer, image_url, context)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(quiz_id)
        .bind(&question.text)
        .bind(Json(&question.options))
        .bind(&question.answer)
        .bind(&question.image_url)
        .bind(&question.context)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(quiz_id, "Failed to insert question, rolling back: {:?}", e);
            e
        })?;
    }

    tx.commit().await?;

    tracing::info!(quiz_id, questions = questions.len(), "Quiz created");
    Ok(quiz_id)
}

/// Loads a quiz with its questions in ascending id order.
pub async fn get_quiz(pool: &SqlitePool, quiz_id: i64) -> Result<Quiz, QuizError> {
    let header = find_header(pool, quiz_id)
        .await?
        .ok_or_else(|| QuizError::NotFound(format!("quiz {quiz_id}")))?;

    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, text, options, answer, image_url, context
        FROM questions
        WHERE quiz_id = ?
        ORDER BY id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    Ok(Quiz { header, questions })
}

pub async fn find_header<'e>(
    executor: impl SqliteExecutor<'e>,
    quiz_id: i64,
) -> Result<Option<QuizHeader>, QuizError> {
    let header = sqlx::query_as::<_, QuizHeader>(
        "SELECT id, title, created_by, created_at FROM quizzes WHERE id = ?",
    )
    .bind(quiz_id)
    .fetch_optional(executor)
    .await?;

    Ok(header)
}

/// Correct answers of a quiz in persisted (ascending id) order.
pub async fn answer_keys<'e>(
    executor: impl SqliteExecutor<'e>,
    quiz_id: i64,
) -> Result<Vec<AnswerKey>, QuizError> {
    let keys = sqlx::query_as::<_, AnswerKey>(
        "SELECT id, text, answer FROM questions WHERE quiz_id = ? ORDER BY id",
    )
    .bind(quiz_id)
    .fetch_all(executor)
    .await?;

    Ok(keys)
}

/// Every quiz, newest first, with the user's score/rank (0 when never
/// attempted), the number of users who attempted it and the best score.
pub async fn list_quizzes_with_user_standing(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<QuizStanding>, QuizError> {
    let standings = sqlx::query_as::<_, QuizStanding>(
        r#"
        SELECT
            q.id,
            q.title,
            COALESCE(qr.score, 0.0) AS user_score,
            COALESCE(r.rank, 0) AS rank,
            COALESCE(a.attempts, 0) AS total_attempts,
            COALESCE(a.high_score, 0.0) AS high_score
        FROM quizzes q
        LEFT JOIN quiz_results qr ON qr.quiz_id = q.id AND qr.user_id = ?
        LEFT JOIN (
            SELECT quiz_id, user_id,
                   RANK() OVER (PARTITION BY quiz_id ORDER BY score DESC) AS rank
            FROM quiz_results
        ) r ON r.quiz_id = q.id AND r.user_id = ?
        LEFT JOIN (
            SELECT quiz_id, COUNT(DISTINCT user_id) AS attempts, MAX(score) AS high_score
            FROM quiz_results
            GROUP BY quiz_id
        ) a ON a.quiz_id = q.id
        ORDER BY q.id DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(standings)
}

/// Quizzes built by `user_id`, newest first.
pub async fn list_created_quizzes(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<QuizHeader>, QuizError> {
    let quizzes = sqlx::query_as::<_, QuizHeader>(
        r#"
        SELECT id, title, created_by, created_at
        FROM quizzes
        WHERE created_by = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    tracing::debug!(user_id, count = quizzes.len(), "Fetched created quizzes");
    Ok(quizzes)
}
