// src/store/result.rs

use sqlx::{SqliteExecutor, SqlitePool};

use crate::{
    error::QuizError,
    models::quiz_result::{LeaderboardEntry, TopScore, UserStats},
};

/// Records `score` for (user, quiz), keeping the stored score only ever
/// increasing: an existing row is overwritten only by a strictly higher score.
///
/// Returns `true` if a row was inserted or raised.
pub async fn upsert_result<'e>(
    executor: impl SqliteExecutor<'e>,
    user_id: i64,
    quiz_id: i64,
    score: f64,
) -> Result<bool, QuizError> {
    let result = sqlx::query(
        r#"
        INSERT INTO quiz_results (user_id, quiz_id, score)
        VALUES (?, ?, ?)
        ON CONFLICT(user_id, quiz_id) DO UPDATE SET
            score = excluded.score,
            created_at = CURRENT_TIMESTAMP
        WHERE excluded.score > quiz_results.score
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .execute(executor)
    .await
    .map_err(|e| {
        tracing::error!(user_id, quiz_id, "Failed to upsert quiz result: {:?}", e);
        e
    })?;

    Ok(result.rows_affected() > 0)
}

/// The user's stored best score for a quiz.
pub async fn best_score<'e>(
    executor: impl SqliteExecutor<'e>,
    user_id: i64,
    quiz_id: i64,
) -> Result<Option<f64>, QuizError> {
    let score = sqlx::query_scalar::<_, f64>(
        "SELECT score FROM quiz_results WHERE user_id = ? AND quiz_id = ?",
    )
    .bind(user_id)
    .bind(quiz_id)
    .fetch_optional(executor)
    .await?;

    Ok(score)
}

/// Competition rank (1,1,3,...) of the user's score among all results of a quiz.
pub async fn quiz_rank<'e>(
    executor: impl SqliteExecutor<'e>,
    quiz_id: i64,
    user_id: i64,
) -> Result<Option<i64>, QuizError> {
    let rank = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT rank FROM (
            SELECT user_id, RANK() OVER (ORDER BY score DESC) AS rank
            FROM quiz_results
            WHERE quiz_id = ?
        )
        WHERE user_id = ?
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(rank)
}

/// Results of every quiz, ranked within their quiz.
pub async fn leaderboard(pool: &SqlitePool, limit: i64) -> Result<Vec<LeaderboardEntry>, QuizError> {
    let entries = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT
            RANK() OVER (PARTITION BY qr.quiz_id ORDER BY qr.score DESC) AS rank,
            u.username,
            q.title AS quiz_name,
            qr.score
        FROM quiz_results qr
        JOIN users u ON qr.user_id = u.id
        JOIN quizzes q ON qr.quiz_id = q.id
        ORDER BY qr.quiz_id, rank, u.username
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Users ranked by the average of their best scores; ranks up to `limit`.
pub async fn top_scores(pool: &SqlitePool, limit: i64) -> Result<Vec<TopScore>, QuizError> {
    let scores = sqlx::query_as::<_, TopScore>(
        r#"
        WITH averages AS (
            SELECT
                u.username,
                AVG(qr.score) AS score,
                RANK() OVER (ORDER BY AVG(qr.score) DESC) AS rank
            FROM users u
            JOIN quiz_results qr ON u.id = qr.user_id
            GROUP BY u.id, u.username
        )
        SELECT rank, username, score
        FROM averages
        WHERE rank <= ?
        ORDER BY rank, username
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(scores)
}

pub async fn user_stats(pool: &SqlitePool, user_id: i64) -> Result<UserStats, QuizError> {
    let (quizzes_taken, average_score) = sqlx::query_as::<_, (i64, f64)>(
        r#"
        SELECT COUNT(DISTINCT quiz_id), COALESCE(AVG(score), 0.0)
        FROM quiz_results
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let global_rank = sqlx::query_scalar::<_, i64>(
        r#"
        WITH ranks AS (
            SELECT user_id, RANK() OVER (ORDER BY AVG(score) DESC) AS rank
            FROM quiz_results
            GROUP BY user_id
        )
        SELECT rank FROM ranks WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .unwrap_or(0);

    Ok(UserStats {
        quizzes_taken,
        average_score,
        global_rank,
    })
}
