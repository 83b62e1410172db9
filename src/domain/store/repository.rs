//! Backing-store trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Contract for the backing key-value store.
///
/// The store is the only shared mutable state in the system, so the
/// primitives here must each be atomic at the store level: `increment` is a
/// single round-trip counter update (never a read-modify-write pair) and
/// `append` is a single ordered-list push. Absent keys are `Ok(None)`, never
/// an error; errors mean the store itself was unreachable or misbehaved.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Gets the raw bytes stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Stores raw bytes under `key` with no expiration
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), DomainError>;

    /// Stores raw bytes under `key`, expiring after `ttl`
    async fn set_with_ttl(&self, key: &str, value: &[u8], ttl: Duration)
        -> Result<(), DomainError>;

    /// Atomically adds `delta` to the counter at `key`, returning the new value
    async fn increment(&self, key: &str, delta: i64) -> Result<i64, DomainError>;

    /// Atomically appends `value` to the ordered list at `key`
    async fn append(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Returns list elements between `start` and `stop` inclusive.
    ///
    /// Negative indices count from the end of the list, so `(0, -1)` is the
    /// whole list. An absent list is an empty sequence.
    async fn range(&self, key: &str, start: isize, stop: isize)
        -> Result<Vec<String>, DomainError>;

    /// Removes every entry this store handle owns
    async fn clear(&self) -> Result<(), DomainError>;
}
