//! Call counting and call history decorators

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::operation::Operation;
use crate::domain::store::KeyValueStore;
use crate::domain::{decode, DomainError};

fn calls_key(id: &str) -> String {
    format!("{}:calls", id)
}

fn inputs_key(id: &str) -> String {
    format!("{}:inputs", id)
}

fn outputs_key(id: &str) -> String {
    format!("{}:outputs", id)
}

/// Operation wrapper that counts every invocation.
///
/// The counter at `"{id}:calls"` is incremented through the store's atomic
/// increment before delegating, and is not rolled back when the inner
/// operation fails - the count is at-least-once, not once-per-success.
#[derive(Debug)]
pub struct Counted<Op> {
    inner: Op,
    store: Arc<dyn KeyValueStore>,
    id: String,
}

impl<Op> Counted<Op> {
    /// Wraps `inner` under the caller-supplied stable identifier `id`
    pub fn new(inner: Op, store: Arc<dyn KeyValueStore>, id: impl Into<String>) -> Self {
        Self {
            inner,
            store,
            id: id.into(),
        }
    }
}

#[async_trait]
impl<Op: Operation> Operation for Counted<Op> {
    type Input = Op::Input;
    type Output = Op::Output;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, DomainError> {
        self.store.increment(&calls_key(&self.id), 1).await?;
        self.inner.call(input).await
    }
}

/// Operation wrapper that records a durable audit trail of calls.
///
/// The display form of the input is appended to `"{id}:inputs"` before
/// delegating; the display form of the result is appended to
/// `"{id}:outputs"` only after a successful return. A failed call therefore
/// leaves an unpaired input entry behind, which is what makes failures
/// visible when inspecting the history.
#[derive(Debug)]
pub struct Recorded<Op> {
    inner: Op,
    store: Arc<dyn KeyValueStore>,
    id: String,
}

impl<Op> Recorded<Op> {
    /// Wraps `inner` under the caller-supplied stable identifier `id`
    pub fn new(inner: Op, store: Arc<dyn KeyValueStore>, id: impl Into<String>) -> Self {
        Self {
            inner,
            store,
            id: id.into(),
        }
    }
}

#[async_trait]
impl<Op> Operation for Recorded<Op>
where
    Op: Operation,
    Op::Input: fmt::Display + Sync,
    Op::Output: fmt::Display,
{
    type Input = Op::Input;
    type Output = Op::Output;

    async fn call(&self, input: Self::Input) -> Result<Self::Output, DomainError> {
        self.store
            .append(&inputs_key(&self.id), &input.to_string())
            .await?;

        let output = self.inner.call(input).await?;

        self.store
            .append(&outputs_key(&self.id), &output.to_string())
            .await?;

        Ok(output)
    }
}

/// Returns the invocation count recorded for `id`
pub async fn call_count(store: &dyn KeyValueStore, id: &str) -> Result<u64, DomainError> {
    match store.get(&calls_key(id)).await? {
        Some(raw) => Ok(decode::integer(&raw)?.max(0) as u64),
        None => Ok(0),
    }
}

/// Returns the recorded (inputs, outputs) history for `id`, in call order
pub async fn call_history(
    store: &dyn KeyValueStore,
    id: &str,
) -> Result<(Vec<String>, Vec<String>), DomainError> {
    let inputs = store.range(&inputs_key(id), 0, -1).await?;
    let outputs = store.range(&outputs_key(id), 0, -1).await?;
    Ok((inputs, outputs))
}

/// Renders the recorded history for `id` as a human-readable report.
///
/// The call count is the number of recorded outputs; when only the counter
/// decorator ran there is no history, so the report falls back to the raw
/// counter value and lists no per-call detail.
pub async fn replay(store: &dyn KeyValueStore, id: &str) -> Result<String, DomainError> {
    let (inputs, outputs) = call_history(store, id).await?;

    let calls = if outputs.is_empty() {
        call_count(store, id).await?
    } else {
        outputs.len() as u64
    };

    let mut report = format!("{} was called {} times:", id, calls);

    for (input, output) in inputs.iter().zip(outputs.iter()) {
        report.push_str(&format!("\n{}({}) -> {}", id, input, output));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::store::InMemoryStore;

    #[derive(Debug)]
    struct EchoOp {
        fail: bool,
    }

    #[async_trait]
    impl Operation for EchoOp {
        type Input = String;
        type Output = String;

        async fn call(&self, input: String) -> Result<String, DomainError> {
            if self.fail {
                Err(DomainError::storage("backing store unavailable"))
            } else {
                Ok(format!("echo:{}", input))
            }
        }
    }

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(InMemoryStore::new())
    }

    #[tokio::test]
    async fn test_counted_increments_once_per_call() {
        let store = store();
        let op = Counted::new(EchoOp { fail: false }, store.clone(), "echo");

        for _ in 0..5 {
            op.call("hi".to_string()).await.unwrap();
        }

        assert_eq!(call_count(store.as_ref(), "echo").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_counted_zero_before_first_call() {
        let store = store();

        assert_eq!(call_count(store.as_ref(), "echo").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counted_keeps_count_on_failure() {
        let store = store();
        let op = Counted::new(EchoOp { fail: true }, store.clone(), "echo");

        let result = op.call("hi".to_string()).await;
        assert!(result.is_err());

        // Increment is not rolled back
        assert_eq!(call_count(store.as_ref(), "echo").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counted_returns_inner_result_unchanged() {
        let store = store();
        let op = Counted::new(EchoOp { fail: false }, store.clone(), "echo");

        let output = op.call("hi".to_string()).await.unwrap();
        assert_eq!(output, "echo:hi");
    }

    #[tokio::test]
    async fn test_recorded_pairs_inputs_with_outputs() {
        let store = store();
        let op = Recorded::new(EchoOp { fail: false }, store.clone(), "echo");

        op.call("a".to_string()).await.unwrap();
        op.call("b".to_string()).await.unwrap();

        let (inputs, outputs) = call_history(store.as_ref(), "echo").await.unwrap();
        assert_eq!(inputs, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(outputs, vec!["echo:a".to_string(), "echo:b".to_string()]);
    }

    #[tokio::test]
    async fn test_recorded_skips_output_on_failure() {
        let store = store();
        let op = Recorded::new(EchoOp { fail: true }, store.clone(), "echo");

        let result = op.call("a".to_string()).await;
        assert!(result.is_err());

        let (inputs, outputs) = call_history(store.as_ref(), "echo").await.unwrap();
        assert_eq!(inputs, vec!["a".to_string()]);
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn test_counter_agrees_with_history_when_composed() {
        let store = store();
        let op = Counted::new(
            Recorded::new(EchoOp { fail: false }, store.clone(), "echo"),
            store.clone(),
            "echo",
        );

        for input in ["a", "b", "c"] {
            op.call(input.to_string()).await.unwrap();
        }

        let count = call_count(store.as_ref(), "echo").await.unwrap();
        let (inputs, outputs) = call_history(store.as_ref(), "echo").await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(inputs.len(), 3);
        assert_eq!(outputs.len(), 3);
    }

    #[tokio::test]
    async fn test_replay_report_format() {
        let store = store();
        let op = Counted::new(
            Recorded::new(EchoOp { fail: false }, store.clone(), "echo"),
            store.clone(),
            "echo",
        );

        op.call("a".to_string()).await.unwrap();
        op.call("b".to_string()).await.unwrap();

        let report = replay(store.as_ref(), "echo").await.unwrap();
        assert_eq!(
            report,
            "echo was called 2 times:\necho(a) -> echo:a\necho(b) -> echo:b"
        );
    }

    #[tokio::test]
    async fn test_replay_counter_only() {
        let store = store();
        let op = Counted::new(EchoOp { fail: false }, store.clone(), "echo");

        for _ in 0..3 {
            op.call("hi".to_string()).await.unwrap();
        }

        // No history was recorded, so the report lists the count alone
        let report = replay(store.as_ref(), "echo").await.unwrap();
        assert_eq!(report, "echo was called 3 times:");
    }

    #[tokio::test]
    async fn test_replay_never_called() {
        let store = store();

        let report = replay(store.as_ref(), "echo").await.unwrap();
        assert_eq!(report, "echo was called 0 times:");
    }
}
