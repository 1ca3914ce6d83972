//! Cancellation handles for in-flight requests.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A handle through which an in-flight request can be aborted.
///
/// Clones share the same underlying signal: triggering any clone is observed
/// by all of them. The transport receives a clone and aborts the network call
/// once [`cancelled`](Self::cancelled) resolves.
///
/// # Examples
///
/// ```
/// use simfetch::client::CancellationHandle;
///
/// let handle = CancellationHandle::new();
/// let observer = handle.clone();
///
/// handle.trigger();
/// assert!(observer.is_triggered());
/// assert_eq!(handle.id(), observer.id());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    id: Uuid,
    token: CancellationToken,
}

impl CancellationHandle {
    /// Create a fresh, untriggered handle.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once [`trigger`](Self::trigger) has been called.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Identity shared by all clones of this handle.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_handle_is_untriggered() {
        let handle = CancellationHandle::new();
        assert!(!handle.is_triggered());
    }

    #[test]
    fn test_distinct_handles_have_distinct_ids() {
        assert_ne!(CancellationHandle::new().id(), CancellationHandle::new().id());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_trigger() {
        let handle = CancellationHandle::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });

        handle.trigger();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("cancelled() should resolve")
            .unwrap();
    }
}
