// src/store/user.rs

use sqlx::SqlitePool;

use crate::{error::QuizError, models::user::User};

/// Inserts a user; a taken username or email is a `Conflict`.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, QuizError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password)
        VALUES (?, ?, ?)
        RETURNING id, username, email, password, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            QuizError::Conflict("Username or email already exists".to_string())
        }
        other => {
            tracing::error!("Failed to create user: {:?}", other);
            QuizError::from(other)
        }
    })
}

pub async fn find_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, QuizError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<User, QuizError> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, password, created_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| QuizError::NotFound(format!("user {user_id}")))
}
