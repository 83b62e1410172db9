use std::time::Duration;

use tracked_cache::domain::PageFetcher;
use tracked_cache::infrastructure::cache::{CacheService, CachedFetcher};
use tracked_cache::infrastructure::fetch::HttpPageFetcher;
use tracked_cache::infrastructure::logging;
use tracked_cache::AppConfig;

const DEMO_PAGE: &str = "http://example.com";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let store = tracked_cache::create_store(&config).await?;
    let cache = CacheService::new(store.clone());

    let key = cache.store("hello").await?;
    let text = cache.get_as_text(&key).await?;
    tracing::info!(%key, ?text, "Stored and read back a text record");

    let key = cache.store(123i64).await?;
    let number = cache.get_as_integer(&key).await?;
    tracing::info!(%key, ?number, "Stored and read back an integer record");

    println!("{}", cache.replay(CacheService::STORE_OPERATION).await?);

    let pages = CachedFetcher::with_ttl(
        HttpPageFetcher::new(),
        store.clone(),
        Duration::from_secs(config.cache.page_ttl_secs),
    );

    pages.fetch(DEMO_PAGE).await?;
    let body = pages.fetch(DEMO_PAGE).await?;
    let accesses = pages.access_count(DEMO_PAGE).await?;
    tracing::info!(
        url = DEMO_PAGE,
        bytes = body.len(),
        accesses,
        "Fetched page twice; second read served from the cache"
    );

    Ok(())
}
