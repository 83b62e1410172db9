//! Expiring page cache with access counting

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::fetch::PageFetcher;
use crate::domain::store::KeyValueStore;
use crate::domain::{decode, DomainError};

/// TTL applied to cached pages unless one is configured
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10);

fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

fn cache_key(url: &str) -> String {
    format!("cached:{}", url)
}

/// Page fetcher wrapper that memoizes results in the backing store.
///
/// Every fetch attempt increments `"count:{url}"` first, hit or miss. A
/// fresh cached body at `"cached:{url}"` is returned without touching the
/// inner fetcher; otherwise the inner fetcher runs and its result is stored
/// with the configured TTL. Expiry is the store's native TTL - once the
/// deadline passes the entry reads as absent and the next fetch goes to the
/// inner fetcher again. A failed inner fetch is surfaced, never papered over
/// with stale data.
#[derive(Debug)]
pub struct CachedFetcher<F> {
    inner: F,
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl<F: PageFetcher> CachedFetcher<F> {
    pub fn new(inner: F, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_ttl(inner, store, DEFAULT_PAGE_TTL)
    }

    pub fn with_ttl(inner: F, store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { inner, store, ttl }
    }

    /// Returns how many times `url` has been requested, hit or miss
    pub async fn access_count(&self, url: &str) -> Result<u64, DomainError> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => Ok(decode::integer(&raw)?.max(0) as u64),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, DomainError> {
        self.store.increment(&count_key(url), 1).await?;

        if let Some(cached) = self.store.get(&cache_key(url)).await? {
            tracing::debug!(url = %url, "Cache hit for page");
            return decode::text(&cached);
        }

        tracing::debug!(url = %url, "Cache miss, fetching page");

        let body = self.inner.fetch(url).await?;

        self.store
            .set_with_ttl(&cache_key(url), body.as_bytes(), self.ttl)
            .await?;

        Ok(body)
    }
}
