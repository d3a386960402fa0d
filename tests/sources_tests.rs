// tests/sources_tests.rs

//! Upstream HTTP clients against a local stub of the trivia, wiki and dictionary APIs.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use quiz_backend::{
    error::QuizError,
    services::{
        context::{ContextSource, WikiContextSource},
        dictionary::DictionaryClient,
        enrichment::{EnrichmentPipeline, EnrichmentPolicy, normalize},
        http_client,
        image::PlaceholderImages,
        trivia::{HttpTriviaSource, TriviaSource},
    },
};
use serde_json::json;

async fn trivia(Query(params): Query<HashMap<String, String>>) -> Response {
    let amount: usize = params.get("amount").and_then(|a| a.parse().ok()).unwrap_or(0);

    match params.get("category").map(String::as_str) {
        Some("1") => Json(json!({ "response_code": 1, "results": [] })).into_response(),
        Some("2") => Json(json!({ "response_code": 0, "results": [] })).into_response(),
        Some("3") => "definitely not json".into_response(),
        Some("4") => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => {
            // Base64-encoded payload, like `encode=base64` on the real API.
            let enc = |s: &str| STANDARD.encode(s);
            let difficulty = params.get("difficulty").cloned().unwrap_or_default();
            let results: Vec<_> = (0..amount)
                .map(|i| {
                    json!({
                        "category": enc("Science: Computers"),
                        "type": enc("multiple"),
                        "difficulty": enc(&difficulty),
                        "question": enc(&format!("Question &quot;{i}&quot;")),
                        "correct_answer": enc(&format!("Answer {i}")),
                        "incorrect_answers": [enc("Type"), enc("Side"), enc("Nope")]
                    })
                })
                .collect();
            Json(json!({ "response_code": 0, "results": results })).into_response()
        }
    }
}

async fn categories() -> impl IntoResponse {
    Json(json!({
        "trivia_categories": [
            { "id": 9, "name": "General Knowledge" },
            { "id": 18, "name": "Science: Computers" }
        ]
    }))
}

async fn wiki(Path(topic): Path<String>) -> Response {
    if topic == "Missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "title": topic, "extract": format!("About {topic}.") })).into_response()
}

async fn dictionary(Path(word): Path<String>) -> Response {
    match word.as_str() {
        "hello" => Json(json!([{
            "word": "hello",
            "phonetic": "/həˈləʊ/",
            "meanings": [{
                "partOfSpeech": "exclamation",
                "definitions": [{ "definition": "used as a greeting", "example": "hello there" }]
            }]
        }]))
        .into_response(),
        "empty" => Json(json!([])).into_response(),
        "broken" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "title": "No Definitions Found" })))
            .into_response(),
    }
}

/// Spawns the stub upstream on a random port and returns its base URL.
async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/api.php", get(trivia))
        .route("/api_category.php", get(categories))
        .route("/wiki/{topic}", get(wiki))
        .route("/dict/{word}", get(dictionary));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn trivia_source(base: &str) -> HttpTriviaSource {
    HttpTriviaSource::new(
        http_client(Duration::from_secs(5)).unwrap(),
        format!("{base}/api.php"),
        format!("{base}/api_category.php"),
    )
}

#[tokio::test]
async fn trivia_source_fetches_requested_amount() {
    let base = spawn_upstream().await;
    let questions = trivia_source(&base)
        .fetch_questions(9, "EASY", 3)
        .await
        .unwrap();

    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].difficulty, STANDARD.encode("easy"));

    let last = normalize(questions.into_iter().last().unwrap());
    assert_eq!(last.correct_answer, "Answer 2");
    assert_eq!(last.incorrect_answers, ["Type", "Side", "Nope"]);
}

#[tokio::test]
async fn trivia_source_maps_upstream_failures() {
    let base = spawn_upstream().await;
    let source = trivia_source(&base);

    let err = source.fetch_questions(1, "", 3).await.unwrap_err();
    assert!(matches!(err, QuizError::SourceUnavailable(_)), "{err:?}");

    let err = source.fetch_questions(2, "", 3).await.unwrap_err();
    assert!(matches!(err, QuizError::SourceDataError(_)), "{err:?}");

    let err = source.fetch_questions(3, "", 3).await.unwrap_err();
    assert!(matches!(err, QuizError::SourceDataError(_)), "{err:?}");

    let err = source.fetch_questions(4, "", 3).await.unwrap_err();
    assert!(matches!(err, QuizError::SourceUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_trivia_source_is_unavailable() {
    let source = trivia_source("http://127.0.0.1:1");
    let err = source.fetch_questions(9, "", 3).await.unwrap_err();
    assert!(matches!(err, QuizError::SourceUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn categories_are_passed_through() {
    let base = spawn_upstream().await;
    let categories = trivia_source(&base).fetch_categories().await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].id, 18);
    assert_eq!(categories[1].name, "Science: Computers");
}

#[tokio::test]
async fn wiki_source_encodes_topic_and_maps_status() {
    let base = spawn_upstream().await;
    let source = WikiContextSource::new(
        http_client(Duration::from_secs(5)).unwrap(),
        format!("{base}/wiki"),
    );

    let extract = source.summary("Science: Computers").await.unwrap();
    assert_eq!(extract, "About Science: Computers.");

    let err = source.summary("Missing").await.unwrap_err();
    assert!(matches!(err, QuizError::SourceUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn dictionary_client_returns_first_entry() {
    let base = spawn_upstream().await;
    let client = DictionaryClient::new(
        http_client(Duration::from_secs(5)).unwrap(),
        format!("{base}/dict"),
    );

    let entry = client.define("hello").await.unwrap();
    assert_eq!(entry.word, "hello");
    assert_eq!(entry.meanings[0].part_of_speech, "exclamation");
    assert_eq!(entry.meanings[0].definitions[0].example.as_deref(), Some("hello there"));

    assert!(matches!(client.define("zzzz").await, Err(QuizError::NotFound(_))));
    assert!(matches!(client.define("empty").await, Err(QuizError::NotFound(_))));
    assert!(matches!(
        client.define("broken").await,
        Err(QuizError::SourceUnavailable(_))
    ));
}

#[tokio::test]
async fn pipeline_over_http_normalizes_and_enriches() {
    let base = spawn_upstream().await;
    let client = http_client(Duration::from_secs(5)).unwrap();
    let pipeline = EnrichmentPipeline::new(
        Arc::new(trivia_source(&base)),
        Arc::new(WikiContextSource::new(client, format!("{base}/wiki"))),
        PlaceholderImages::new("https://placehold.co/600x400".into(), Duration::from_secs(60)),
        EnrichmentPolicy::Strict,
    );

    let questions = pipeline.build_quiz(9, "easy", 3).await.unwrap();

    assert_eq!(questions.len(), 3);
    for (i, q) in questions.iter().enumerate() {
        assert_eq!(q.category, "Science: Computers");
        assert_eq!(q.question, format!("Question \"{i}\""));
        assert_eq!(q.correct_answer, format!("Answer {i}"));
        assert_eq!(q.incorrect_answers, ["Type", "Side", "Nope"]);
        assert_eq!(q.image_url, "https://placehold.co/600x400?text=Science%3A+Computers");
        assert_eq!(q.context, "About Science: Computers.");
    }
}
