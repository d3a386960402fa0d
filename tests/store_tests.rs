// tests/store_tests.rs

use quiz_backend::{
    error::QuizError,
    models::question::NewQuestion,
    services::scoring,
    store,
};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Fresh in-memory database with migrations applied.
/// A single connection keeps every query on the same in-memory database.
async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

async fn user(pool: &SqlitePool, name: &str) -> i64 {
    store::user::create_user(pool, name, &format!("{name}@example.com"), "hash")
        .await
        .expect("Failed to create user")
        .id
}

fn question(text: &str, answer: &str) -> NewQuestion {
    NewQuestion::new(
        text.to_string(),
        answer.to_string(),
        vec!["Wrong 1".to_string(), "Wrong 2".to_string()],
        Some(format!("https://img/{text}")),
        Some(format!("Context for {text}")),
    )
}

async fn quiz_with(pool: &SqlitePool, creator: i64, answers: &[&str]) -> i64 {
    let questions: Vec<NewQuestion> = answers
        .iter()
        .enumerate()
        .map(|(i, a)| question(&format!("Q{}", i + 1), a))
        .collect();
    store::quiz::create_quiz(pool, "Quiz", creator, &questions)
        .await
        .expect("Failed to create quiz")
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

fn answers(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn create_and_get_quiz_preserves_question_order_and_fields() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;

    let quiz_id = quiz_with(&pool, alice, &["A1", "A2", "A3"]).await;
    let quiz = store::quiz::get_quiz(&pool, quiz_id).await.unwrap();

    assert_eq!(quiz.header.title, "Quiz");
    assert_eq!(quiz.header.created_by, Some(alice));
    let texts: Vec<_> = quiz.questions.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, ["Q1", "Q2", "Q3"]);

    let first = &quiz.questions[0];
    assert_eq!(first.answer, "A1");
    assert_eq!(first.options.0, vec!["A1", "Wrong 1", "Wrong 2"]);
    assert_eq!(first.image_url.as_deref(), Some("https://img/Q1"));
    assert_eq!(first.context.as_deref(), Some("Context for Q1"));
}

#[tokio::test]
async fn get_missing_quiz_is_not_found() {
    let pool = test_pool().await;
    let err = store::quiz::get_quiz(&pool, 42).await.unwrap_err();
    assert!(matches!(err, QuizError::NotFound(_)));
}

#[tokio::test]
async fn create_quiz_is_all_or_nothing() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;

    sqlx::query(
        r#"
        CREATE TRIGGER reject_boom BEFORE INSERT ON questions
        WHEN NEW.text = 'boom'
        BEGIN
            SELECT RAISE(ABORT, 'boom rejected');
        END
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let questions = vec![question("fine", "A"), question("boom", "B"), question("late", "C")];
    let err = store::quiz::create_quiz(&pool, "Doomed", alice, &questions)
        .await
        .unwrap_err();

    assert!(matches!(err, QuizError::Persistence(_)));
    assert_eq!(count(&pool, "quizzes").await, 0);
    assert_eq!(count(&pool, "questions").await, 0);
}

#[tokio::test]
async fn upsert_keeps_the_best_score() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;
    let quiz_id = quiz_with(&pool, alice, &["A"]).await;

    assert!(store::result::upsert_result(&pool, alice, quiz_id, 50.0).await.unwrap());
    assert!(!store::result::upsert_result(&pool, alice, quiz_id, 30.0).await.unwrap());
    assert!(!store::result::upsert_result(&pool, alice, quiz_id, 50.0).await.unwrap());
    assert_eq!(
        store::result::best_score(&pool, alice, quiz_id).await.unwrap(),
        Some(50.0)
    );

    assert!(store::result::upsert_result(&pool, alice, quiz_id, 80.0).await.unwrap());
    assert_eq!(
        store::result::best_score(&pool, alice, quiz_id).await.unwrap(),
        Some(80.0)
    );
    assert_eq!(count(&pool, "quiz_results").await, 1);
}

#[tokio::test]
async fn ranks_use_competition_ranking() {
    let pool = test_pool().await;
    let a = user(&pool, "anna").await;
    let b = user(&pool, "ben").await;
    let c = user(&pool, "cara").await;
    let quiz_id = quiz_with(&pool, a, &["A"]).await;

    store::result::upsert_result(&pool, a, quiz_id, 90.0).await.unwrap();
    store::result::upsert_result(&pool, b, quiz_id, 90.0).await.unwrap();
    store::result::upsert_result(&pool, c, quiz_id, 80.0).await.unwrap();

    let mut ranks = Vec::new();
    for id in [a, b, c] {
        ranks.push(store::result::quiz_rank(&pool, quiz_id, id).await.unwrap());
    }
    assert_eq!(ranks, [Some(1), Some(1), Some(3)]);

    let outsider = user(&pool, "dan").await;
    assert_eq!(store::result::quiz_rank(&pool, quiz_id, outsider).await.unwrap(), None);
}

#[tokio::test]
async fn grade_submission_persists_best_score_and_rank() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let quiz_id = quiz_with(&pool, alice, &["A1", "A2", "A3"]).await;

    let first = scoring::grade_submission(&pool, quiz_id, alice, &answers(&["A1", "A2", "no"]))
        .await
        .unwrap();
    assert_eq!(first.correct_count, 2);
    assert_eq!(first.total_count, 3);
    assert!((first.score - 66.67).abs() < 0.01);
    assert_eq!(first.rank, 1);
    assert_eq!(first.breakdown.len(), 3);

    // A worse retry is reported but not stored.
    let retry = scoring::grade_submission(&pool, quiz_id, alice, &answers(&["A1"]))
        .await
        .unwrap();
    assert!((retry.score - 33.33).abs() < 0.01);
    let stored = store::result::best_score(&pool, alice, quiz_id).await.unwrap().unwrap();
    assert!((stored - 66.67).abs() < 0.01);

    let perfect = scoring::grade_submission(&pool, quiz_id, bob, &answers(&["A1", "A2", "A3"]))
        .await
        .unwrap();
    assert_eq!(perfect.score, 100.0);
    assert_eq!(perfect.correct_count, 3);
    assert_eq!(perfect.rank, 1);

    assert_eq!(store::result::quiz_rank(&pool, quiz_id, alice).await.unwrap(), Some(2));
}

#[tokio::test]
async fn grade_submission_rejects_missing_and_empty_quizzes() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;

    let err = scoring::grade_submission(&pool, 99, alice, &answers(&["A"]))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::NotFound(_)));

    let empty = store::quiz::create_quiz(&pool, "Empty", alice, &[]).await.unwrap();
    let err = scoring::grade_submission(&pool, empty, alice, &answers(&["A"]))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::EmptyQuiz(id) if id == empty));
    assert_eq!(count(&pool, "quiz_results").await, 0);
}

#[tokio::test]
async fn standings_show_zero_for_unattempted_quizzes() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let older = quiz_with(&pool, alice, &["A"]).await;
    let newer = quiz_with(&pool, alice, &["A", "B"]).await;

    store::result::upsert_result(&pool, alice, older, 100.0).await.unwrap();
    store::result::upsert_result(&pool, bob, older, 40.0).await.unwrap();

    let standings = store::quiz::list_quizzes_with_user_standing(&pool, bob)
        .await
        .unwrap();
    assert_eq!(standings.len(), 2);

    // Newest first.
    assert_eq!(standings[0].id, newer);
    assert_eq!(standings[0].user_score, 0.0);
    assert_eq!(standings[0].rank, 0);
    assert_eq!(standings[0].total_attempts, 0);
    assert_eq!(standings[0].high_score, 0.0);

    assert_eq!(standings[1].id, older);
    assert_eq!(standings[1].user_score, 40.0);
    assert_eq!(standings[1].rank, 2);
    assert_eq!(standings[1].total_attempts, 2);
    assert_eq!(standings[1].high_score, 100.0);
}

#[tokio::test]
async fn leaderboard_top_scores_and_stats() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let carol = user(&pool, "carol").await;
    let q1 = quiz_with(&pool, alice, &["A"]).await;
    let q2 = quiz_with(&pool, alice, &["A"]).await;

    store::result::upsert_result(&pool, alice, q1, 100.0).await.unwrap();
    store::result::upsert_result(&pool, bob, q1, 50.0).await.unwrap();
    store::result::upsert_result(&pool, alice, q2, 60.0).await.unwrap();
    store::result::upsert_result(&pool, bob, q2, 90.0).await.unwrap();

    let board = store::result::leaderboard(&pool, 50).await.unwrap();
    let rows: Vec<_> = board
        .iter()
        .map(|e| (e.rank, e.username.as_str(), e.score))
        .collect();
    assert_eq!(
        rows,
        [(1, "alice", 100.0), (2, "bob", 50.0), (1, "bob", 90.0), (2, "alice", 60.0)]
    );

    // alice avg 80, bob avg 70
    let top = store::result::top_scores(&pool, 1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].username, "alice");
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[0].score, 80.0);

    let stats = store::result::user_stats(&pool, bob).await.unwrap();
    assert_eq!(stats.quizzes_taken, 2);
    assert_eq!(stats.average_score, 70.0);
    assert_eq!(stats.global_rank, 2);

    let none = store::result::user_stats(&pool, carol).await.unwrap();
    assert_eq!(none.quizzes_taken, 0);
    assert_eq!(none.average_score, 0.0);
    assert_eq!(none.global_rank, 0);
}

#[tokio::test]
async fn duplicate_users_conflict() {
    let pool = test_pool().await;
    user(&pool, "alice").await;

    let err = store::user::create_user(&pool, "alice", "other@example.com", "hash")
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::Conflict(_)));

    let err = store::user::create_user(&pool, "alicia", "alice@example.com", "hash")
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::Conflict(_)));
}

#[tokio::test]
async fn created_quizzes_are_listed_per_creator() {
    let pool = test_pool().await;
    let alice = user(&pool, "alice").await;
    let bob = user(&pool, "bob").await;
    let first = quiz_with(&pool, alice, &["A"]).await;
    let second = quiz_with(&pool, alice, &["A"]).await;
    quiz_with(&pool, bob, &["A"]).await;

    let mine = store::quiz::list_created_quizzes(&pool, alice).await.unwrap();
    let ids: Vec<_> = mine.iter().map(|q| q.id).collect();
    assert_eq!(ids, [second, first]);
}

#[tokio::test]
async fn concurrent_submissions_all_persist() {
    let path = std::env::temp_dir().join(format!(
        "quiz-concurrent-{}-{}.db",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true),
        )
        .await
        .expect("Failed to open file-backed SQLite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let creator = user(&pool, "creator").await;
    let quiz_id = quiz_with(&pool, creator, &["A"]).await;

    let mut players = Vec::new();
    for i in 0..20 {
        players.push(user(&pool, &format!("player{i}")).await);
    }

    let handles: Vec<_> = players
        .into_iter()
        .enumerate()
        .map(|(i, player)| {
            let pool = pool.clone();
            let answer = if i % 2 == 0 { "A" } else { "B" };
            tokio::spawn(async move {
                scoring::grade_submission(&pool, quiz_id, player, &answers(&[answer])).await
            })
        })
        .collect();

    let mut failures = Vec::new();
    for handle in handles {
        if let Err(e) = handle.await.unwrap() {
            failures.push(e.to_string());
        }
    }

    assert!(failures.is_empty(), "failed submissions: {failures:?}");
    assert_eq!(count(&pool, "quiz_results").await, 20);

    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
