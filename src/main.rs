// src/main.rs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use dotenvy::dotenv;
use quiz_backend::{
    config::Config,
    routes,
    services::{dictionary::DictionaryClient, enrichment::EnrichmentPipeline, http_client},
    state::AppState,
    store,
    utils::hash::hash_password,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to open database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    if let Err(e) = seed_user(&pool, &config).await {
        tracing::error!("Failed to seed user: {:?}", e);
    }

    let pipeline =
        EnrichmentPipeline::from_config(&config).expect("Failed to build enrichment pipeline");
    tracing::info!(policy = %pipeline.policy(), "Enrichment pipeline ready");

    let client = http_client(config.http_timeout).expect("Failed to build HTTP client");
    let dictionary = DictionaryClient::new(client, config.dictionary_api_url.clone());

    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        pipeline: Arc::new(pipeline),
        dictionary: Arc::new(dictionary),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");

    pool.close().await;
}

/// Creates the configured starter account if it does not exist yet.
async fn seed_user(pool: &SqlitePool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(username), Some(email), Some(password)) =
        (&config.seed_username, &config.seed_email, &config.seed_password)
    {
        if store::user::find_user_by_username(pool, username).await?.is_none() {
            tracing::info!("Seeding user: {}", username);
            let hashed_password = hash_password(password)?;
            store::user::create_user(pool, username, email, &hashed_password).await?;
            tracing::info!("Seed user created successfully.");
        }
    }
    Ok(())
}
