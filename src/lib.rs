//! Tracked Cache
//!
//! An instrumented cache facade over a Redis-style key-value store:
//! - typed store/get of scalar values under generated keys
//! - transparent per-operation call counting and call-history recording,
//!   composed as explicit decorators with a replay report
//! - an expiring page cache with per-resource access counting
//!
//! All shared state lives in the backing store; the facade holds nothing but
//! a store handle, and every counter update and history append is a single
//! atomic store primitive.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::store::KeyValueStore;
use infrastructure::store::{StoreConfig, StoreFactory, StoreKind};
use tracing::info;

/// Creates the backing store selected by the application configuration
pub async fn create_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let kind: StoreKind = config.store.backend.parse()?;

    info!("Store backend: {}", kind);

    let mut store_config = StoreConfig {
        kind,
        redis_url: config.store.redis_url.clone(),
        ..Default::default()
    };

    if let Some(prefix) = &config.store.key_prefix {
        store_config = store_config.with_key_prefix(prefix.clone());
    }

    let store = StoreFactory::new().create(&store_config).await?;

    Ok(store)
}
