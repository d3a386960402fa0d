// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{error::AppError, models::user::MeResponse, store, utils::jwt::Claims};

/// Current user's profile and quiz statistics.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = store::user::find_user_by_id(&pool, user_id).await?;

    let stats = store::result::user_stats(&pool, user_id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(user_id, "Error getting user stats: {}", e);
            Default::default()
        });

    Ok(Json(MeResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        stats,
    }))
}
