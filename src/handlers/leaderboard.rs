// src/handlers/leaderboard.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    config::{LEADERBOARD_LIMIT, TOP_SCORES_LIMIT},
    error::AppError,
    store,
};

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    fn resolve(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, 100)
    }
}

/// Per-quiz rankings of every recorded result.
pub async fn get_leaderboard(
    State(pool): State<SqlitePool>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, AppError> {
    let entries = store::result::leaderboard(&pool, params.resolve(LEADERBOARD_LIMIT)).await?;
    Ok(Json(entries))
}

/// Top performers by average best score.
pub async fn get_top_scores(
    State(pool): State<SqlitePool>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, AppError> {
    let scores = store::result::top_scores(&pool, params.resolve(TOP_SCORES_LIMIT)).await?;
    Ok(Json(scores))
}
