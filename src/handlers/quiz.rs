// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rand::seq::SliceRandom;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::{NewQuestion, PublicQuestion},
        quiz::{CreateQuizRequest, PublicQuiz, Quiz, SubmitQuizRequest},
    },
    services::{enrichment::EnrichmentPipeline, scoring},
    store,
    utils::jwt::Claims,
};

/// Lists trivia categories offered by the upstream source.
pub async fn list_categories(
    State(pipeline): State<Arc<EnrichmentPipeline>>,
) -> Result<impl IntoResponse, AppError> {
    let categories = pipeline.categories().await?;
    Ok(Json(categories))
}

/// Builds a quiz from the trivia source and stores it.
///
/// * Fetches and enriches the questions (pipeline policy decides on partial failures).
/// * Persists the quiz and all questions in one transaction.
pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    State(pipeline): State<Arc<EnrichmentPipeline>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let user_id = claims.user_id()?;

    let enriched = pipeline
        .build_quiz(req.category, &req.difficulty, req.question_count)
        .await?;
    let questions: Vec<NewQuestion> = enriched.into_iter().map(NewQuestion::from).collect();

    let quiz_id = store::quiz::create_quiz(&pool, &req.title, user_id, &questions).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "quiz_id": quiz_id,
            "question_count": questions.len()
        })),
    ))
}

/// Lists every quiz with the caller's score, rank and the quiz's totals.
pub async fn list_quizzes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let standings = store::quiz::list_quizzes_with_user_standing(&pool, claims.user_id()?).await?;
    Ok(Json(standings))
}

/// Lists the quizzes the caller built.
pub async fn list_created_quizzes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = store::quiz::list_created_quizzes(&pool, claims.user_id()?).await?;
    Ok(Json(quizzes))
}

/// Returns a quiz ready to play: answers hidden, options shuffled on every request.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store::quiz::get_quiz(&pool, quiz_id).await?;
    Ok(Json(into_public(quiz)))
}

fn into_public(quiz: Quiz) -> PublicQuiz {
    let mut rng = rand::thread_rng();
    let questions = quiz
        .questions
        .into_iter()
        .map(|q| {
            let mut public = PublicQuestion::from(q);
            public.options.shuffle(&mut rng);
            public
        })
        .collect();

    PublicQuiz {
        id: quiz.header.id,
        title: quiz.header.title,
        questions,
    }
}

/// Grades the caller's answers, keeps their best score and returns their rank.
pub async fn submit_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(req): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome =
        scoring::grade_submission(&pool, quiz_id, claims.user_id()?, &req.answers).await?;
    Ok(Json(outcome))
}
