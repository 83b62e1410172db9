//! Operation trait - the seam the instrumentation decorators wrap

use async_trait::async_trait;

use crate::domain::DomainError;

/// A unary async operation.
///
/// Cross-cutting behaviors (call counting, call history, memoization) are
/// modeled as wrappers that implement this same trait around an inner
/// operation, so chains are built by explicit ordered construction and every
/// layer keeps the input/output contract of the layer below it.
#[async_trait]
pub trait Operation: Send + Sync {
    type Input: Send + 'static;
    type Output: Send;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, DomainError>;
}
