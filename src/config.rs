// src/config.rs

use std::{env, fmt::Display, str::FromStr, time::Duration};

use dotenvy::dotenv;

use crate::services::enrichment::EnrichmentPolicy;

/// Number of questions a single quiz may request from the trivia source.
pub const MAX_QUESTION_COUNT: u64 = 50;

/// Default page size for the per-quiz leaderboard.
pub const LEADERBOARD_LIMIT: i64 = 50;

/// Default number of users in the "top performers" list.
pub const TOP_SCORES_LIMIT: i64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub port: u16,

    pub trivia_api_url: String,
    pub trivia_categories_url: String,
    pub wiki_api_url: String,
    pub dictionary_api_url: String,
    pub placeholder_image_url: String,

    pub http_timeout: Duration,
    pub image_cache_ttl: Duration,
    pub enrichment_policy: EnrichmentPolicy,

    pub seed_username: Option<String>,
    pub seed_email: Option<String>,
    pub seed_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = var_or("DATABASE_URL", "sqlite://quiz.db?mode=rwc");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let rust_log = var_or("RUST_LOG", "info");

        Self {
            database_url,
            jwt_secret,
            jwt_expiration: parse_or("JWT_EXPIRATION", 86_400),
            rust_log,
            port: parse_or("PORT", 8080),
            trivia_api_url: var_or("TRIVIA_API_URL", "https://opentdb.com/api.php"),
            trivia_categories_url: var_or(
                "TRIVIA_CATEGORIES_URL",
                "https://opentdb.com/api_category.php",
            ),
            wiki_api_url: var_or(
                "WIKI_API_URL",
                "https://en.wikipedia.org/api/rest_v1/page/summary",
            ),
            dictionary_api_url: var_or(
                "DICTIONARY_API_URL",
                "https://api.dictionaryapi.dev/api/v2/entries/en",
            ),
            placeholder_image_url: var_or(
                "PLACEHOLDER_IMAGE_URL",
                "https://placehold.co/600x400/1a1a2e/ffffff/png",
            ),
            http_timeout: Duration::from_secs(parse_or("HTTP_TIMEOUT_SECS", 10)),
            image_cache_ttl: Duration::from_secs(parse_or("IMAGE_CACHE_TTL_SECS", 24 * 60 * 60)),
            enrichment_policy: parse_or("ENRICHMENT_POLICY", EnrichmentPolicy::Degrade),
            seed_username: env::var("SEED_USERNAME").ok(),
            seed_email: env::var("SEED_EMAIL").ok(),
            seed_password: env::var("SEED_PASSWORD").ok(),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("Invalid {key} value '{raw}': {e}")),
        Err(_) => default,
    }
}
