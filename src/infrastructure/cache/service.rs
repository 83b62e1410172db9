//! Instrumented cache facade

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::operation::Operation;
use crate::domain::store::KeyValueStore;
use crate::domain::{decode, DomainError, RecordValue};

use super::tracking::{replay, Counted, Recorded};

/// The base store operation: generate a fresh key, write the value untouched
#[derive(Debug)]
struct StoreValue {
    store: Arc<dyn KeyValueStore>,
}

#[async_trait]
impl Operation for StoreValue {
    type Input = RecordValue;
    type Output = String;

    async fn call(&self, value: RecordValue) -> Result<String, DomainError> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, &value.to_bytes()).await?;
        Ok(key)
    }
}

/// Facade over the backing store: scalar values in, typed values out.
///
/// `store` runs through the counting and history decorators, applied in a
/// fixed order at construction (counting outermost), under the stable
/// operation identifier [`CacheService::STORE_OPERATION`]. Reads are plain
/// passthroughs with optional decoding.
#[derive(Debug)]
pub struct CacheService {
    store: Arc<dyn KeyValueStore>,
    store_op: Counted<Recorded<StoreValue>>,
}

impl CacheService {
    /// Stable identifier the instrumented store operation is tracked under
    pub const STORE_OPERATION: &'static str = "store";

    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let store_op = Counted::new(
            Recorded::new(
                StoreValue {
                    store: store.clone(),
                },
                store.clone(),
                Self::STORE_OPERATION,
            ),
            store.clone(),
            Self::STORE_OPERATION,
        );

        Self { store, store_op }
    }

    /// Stores a scalar value under a freshly generated key and returns the key
    pub async fn store(
        &self,
        value: impl Into<RecordValue> + Send,
    ) -> Result<String, DomainError> {
        self.store_op.call(value.into()).await
    }

    /// Gets the raw bytes stored under `key`; absent keys are `Ok(None)`
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        self.store.get(key).await
    }

    /// Gets the value under `key`, decoded by `decoder`.
    ///
    /// Decoder failures surface as Decode errors; the stored bytes are left
    /// untouched.
    pub async fn get_with<T, F>(&self, key: &str, decoder: F) -> Result<Option<T>, DomainError>
    where
        F: FnOnce(&[u8]) -> Result<T, DomainError> + Send,
        T: Send,
    {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(decoder(&raw)?)),
            None => Ok(None),
        }
    }

    /// Gets the value under `key` as UTF-8 text
    pub async fn get_as_text(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.get_with(key, decode::text).await
    }

    /// Gets the value under `key` as an integer
    pub async fn get_as_integer(&self, key: &str) -> Result<Option<i64>, DomainError> {
        self.get_with(key, decode::integer).await
    }

    /// Gets the value under `key` as a float
    pub async fn get_as_float(&self, key: &str) -> Result<Option<f64>, DomainError> {
        self.get_with(key, decode::float).await
    }

    /// Renders the recorded call history for `id` as a report
    pub async fn replay(&self, id: &str) -> Result<String, DomainError> {
        replay(self.store.as_ref(), id).await
    }
}
