//! Page fetcher trait - the expensive external operation

use async_trait::async_trait;

use crate::domain::DomainError;

/// Fetches the content behind a resource identifier.
///
/// Treated as an opaque single-argument call for caching purposes; the
/// expiring wrapper never looks inside the result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, DomainError>;
}
