//! In-memory backing-store implementation

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::store::KeyValueStore;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() > deadline,
            None => false,
        }
    }
}

#[derive(Debug, Default)]
struct Shared {
    entries: HashMap<String, Entry>,
    lists: HashMap<String, Vec<String>>,
}

/// Thread-safe in-memory key-value store for tests and local runs.
///
/// A single mutex guards all state, which makes every primitive atomic from
/// any caller's view - in particular `increment` is parse-add-write under one
/// lock acquisition, never an observable read-then-write pair. Expired
/// entries are dropped lazily on access, mirroring how they simply become
/// unreadable in Redis.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Shared>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let mut shared = self.inner.lock().unwrap();

        let expired = matches!(shared.entries.get(key), Some(entry) if entry.is_expired());
        if expired {
            shared.entries.remove(key);
            return Ok(None);
        }

        Ok(shared.entries.get(key).map(|entry| entry.data.clone()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), DomainError> {
        let mut shared = self.inner.lock().unwrap();

        shared.entries.insert(
            key.to_string(),
            Entry {
                data: value.to_vec(),
                expires_at: None,
            },
        );

        Ok(())
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let mut shared = self.inner.lock().unwrap();

        shared.entries.insert(
            key.to_string(),
            Entry {
                data: value.to_vec(),
                expires_at: Some(Instant::now() + ttl),
            },
        );

        Ok(())
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        let mut shared = self.inner.lock().unwrap();

        let current = match shared.entries.get(key) {
            Some(entry) if entry.is_expired() => 0,
            Some(entry) => String::from_utf8(entry.data.clone())
                .ok()
                .and_then(|text| text.parse::<i64>().ok())
                .ok_or_else(|| {
                    DomainError::storage(format!("Value at '{}' is not an integer", key))
                })?,
            None => 0,
        };

        let new_value = current + delta;
        shared.entries.insert(
            key.to_string(),
            Entry {
                data: new_value.to_string().into_bytes(),
                expires_at: None,
            },
        );

        Ok(new_value)
    }

    async fn append(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut shared = self.inner.lock().unwrap();

        shared
            .lists
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());

        Ok(())
    }

    async fn range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, DomainError> {
        let shared = self.inner.lock().unwrap();

        let Some(list) = shared.lists.get(key) else {
            return Ok(Vec::new());
        };

        let len = list.len() as isize;
        let start = if start < 0 { len + start } else { start }.max(0);
        let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);

        if len == 0 || start > stop {
            return Ok(Vec::new());
        }

        Ok(list[start as usize..=stop as usize].to_vec())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut shared = self.inner.lock().unwrap();

        shared.entries.clear();
        shared.lists.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryStore::new();

        store.set("key1", b"value1").await.unwrap();

        let result = store.get("key1").await.unwrap();
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryStore::new();

        let result = store.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = InMemoryStore::new();

        store
            .set_with_ttl("key1", b"value1", Duration::from_millis(50))
            .await
            .unwrap();

        // Should exist immediately
        assert!(store.get("key1").await.unwrap().is_some());

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(100)).await;

        let result = store.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_increment() {
        let store = InMemoryStore::new();

        let val = store.increment("counter", 5).await.unwrap();
        assert_eq!(val, 5);

        let val = store.increment("counter", 3).await.unwrap();
        assert_eq!(val, 8);

        let val = store.increment("counter", -2).await.unwrap();
        assert_eq!(val, 6);
    }

    #[tokio::test]
    async fn test_increment_non_numeric() {
        let store = InMemoryStore::new();

        store.set("word", b"hello").await.unwrap();

        let result = store.increment("word", 1).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = InMemoryStore::new();

        store.append("log", "first").await.unwrap();
        store.append("log", "second").await.unwrap();
        store.append("log", "third").await.unwrap();

        let items = store.range("log", 0, -1).await.unwrap();
        assert_eq!(
            items,
            vec![
                "first".to_string(),
                "second".to_string(),
                "third".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_range_negative_indices() {
        let store = InMemoryStore::new();

        for item in ["a", "b", "c", "d"] {
            store.append("log", item).await.unwrap();
        }

        let tail = store.range("log", -2, -1).await.unwrap();
        assert_eq!(tail, vec!["c".to_string(), "d".to_string()]);

        let middle = store.range("log", 1, 2).await.unwrap();
        assert_eq!(middle, vec!["b".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_range_missing_list() {
        let store = InMemoryStore::new();

        let items = store.range("missing", 0, -1).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryStore::new();

        store.set("key1", b"value1").await.unwrap();
        store.append("log", "entry").await.unwrap();

        store.clear().await.unwrap();

        assert!(store.get("key1").await.unwrap().is_none());
        assert!(store.range("log", 0, -1).await.unwrap().is_empty());
    }
}
