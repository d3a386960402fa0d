// src/services/image.rs

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use url::form_urlencoded;

#[derive(Debug, Clone)]
struct CacheEntry {
    url: String,
    cached_at: Instant,
}

/// Category → image reference cache with a fixed time-to-live.
///
/// Readers share the lock; inserts take it exclusively. Entries are never
/// evicted by size, only replaced once stale or dropped by [`ImageCache::clear`].
#[derive(Debug)]
pub struct ImageCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ImageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached reference for `category` if it is younger than the TTL.
    pub async fn get(&self, category: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(category)
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.url.clone())
    }

    pub async fn insert(&self, category: &str, url: String) {
        let mut entries = self.entries.write().await;
        entries.insert(
            category.to_string(),
            CacheEntry {
                url,
                cached_at: Instant::now(),
            },
        );
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of entries held, stale ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Deterministic placeholder images keyed by category name.
#[derive(Debug)]
pub struct PlaceholderImages {
    base_url: String,
    cache: ImageCache,
}

impl PlaceholderImages {
    pub fn new(base_url: String, ttl: Duration) -> Self {
        Self {
            base_url,
            cache: ImageCache::new(ttl),
        }
    }

    /// Image reference for a category, served from the cache when fresh.
    pub async fn image_for(&self, category: &str) -> String {
        if let Some(url) = self.cache.get(category).await {
            return url;
        }

        let url = placeholder_url(&self.base_url, category);
        self.cache.insert(category, url.clone()).await;
        url
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }
}

/// `<base>?text=<form-encoded category>`.
pub fn placeholder_url(base_url: &str, category: &str) -> String {
    let text: String = form_urlencoded::byte_serialize(category.as_bytes()).collect();
    format!("{base_url}?text={text}")
}
