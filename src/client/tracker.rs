//! In-flight request tracking.
//!
//! The tracker maps a request key (the fully expanded URL) to the
//! [`CancellationHandle`] of the participating request currently using it.
//! At most one handle is stored per key.
//!
//! # Protocol
//!
//! 1. [`InFlightTracker::try_register`] checks and inserts under one lock and
//!    returns an [`InFlightGuard`], or [`SimFetchError::DuplicateRequest`].
//! 2. The network call runs with a clone of the guard's handle.
//! 3. The guard is released exactly once: explicitly via
//!    [`InFlightGuard::release`] as soon as a response arrives, or on drop for
//!    every other exit (errors, `?`, a dropped future).
//!
//! A stale entry would block the key forever, so the guard only removes the
//! entry if it still holds its own handle.

use super::cancel::CancellationHandle;
use crate::error::{Result, SimFetchError};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Thread-safe map of in-flight request keys to their cancellation handles.
///
/// # Examples
///
/// ```
/// use simfetch::client::InFlightTracker;
///
/// let tracker = InFlightTracker::new();
/// let guard = tracker.try_register("https://example.com/items").unwrap();
///
/// assert!(tracker.is_active("https://example.com/items"));
/// assert!(tracker.try_register("https://example.com/items").is_err());
///
/// drop(guard);
/// assert!(!tracker.is_active("https://example.com/items"));
/// ```
#[derive(Debug, Default)]
pub struct InFlightTracker {
    requests: Mutex<HashMap<String, CancellationHandle>>,
}

impl InFlightTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` currently has a registered handle.
    pub fn is_active(&self, key: &str) -> bool {
        self.requests.lock().contains_key(key)
    }

    /// Store a new handle under `key` and return it.
    ///
    /// Replaces any handle already stored under `key`; callers that need the
    /// at-most-one guarantee use [`try_register`](Self::try_register).
    pub fn register(&self, key: &str) -> CancellationHandle {
        let handle = CancellationHandle::new();
        self.requests.lock().insert(key.to_string(), handle.clone());
        handle
    }

    /// Remove the entry for `key`. Absent keys are a no-op.
    pub fn release(&self, key: &str) {
        self.requests.lock().remove(key);
    }

    /// Atomically check that `key` is free and register a handle for it.
    ///
    /// # Errors
    ///
    /// Returns [`SimFetchError::DuplicateRequest`] if `key` is already active.
    pub fn try_register(&self, key: &str) -> Result<InFlightGuard<'_>> {
        let mut requests = self.requests.lock();
        if requests.contains_key(key) {
            return Err(SimFetchError::DuplicateRequest {
                url: key.to_string(),
            });
        }

        let handle = CancellationHandle::new();
        requests.insert(key.to_string(), handle.clone());

        Ok(InFlightGuard {
            tracker: self,
            key: key.to_string(),
            handle,
            released: false,
        })
    }

    /// Trigger the handle registered under `key`.
    ///
    /// The entry stays registered until the request observes the cancellation
    /// and releases it. Returns `false` if nothing is in flight for `key`.
    pub fn cancel(&self, key: &str) -> bool {
        match self.requests.lock().get(key) {
            Some(handle) => {
                handle.trigger();
                true
            }
            None => false,
        }
    }

    /// Trigger every registered handle, returning how many were triggered.
    pub fn cancel_all(&self) -> usize {
        let requests = self.requests.lock();
        for handle in requests.values() {
            handle.trigger();
        }
        requests.len()
    }

    /// Keys currently in flight, in no particular order.
    pub fn active_keys(&self) -> Vec<String> {
        self.requests.lock().keys().cloned().collect()
    }

    /// Number of keys currently in flight.
    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    fn release_owned(&self, key: &str, handle: &CancellationHandle) {
        let mut requests = self.requests.lock();
        if requests.get(key).map(|h| h.id()) == Some(handle.id()) {
            requests.remove(key);
        }
    }
}

/// Registration of one in-flight request.
///
/// Releases its tracker entry exactly once, either through
/// [`release`](Self::release) or when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    tracker: &'a InFlightTracker,
    key: String,
    handle: CancellationHandle,
    released: bool,
}

impl InFlightGuard<'_> {
    /// The registered key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The handle the network call should observe.
    pub fn handle(&self) -> &CancellationHandle {
        &self.handle
    }

    /// Release the entry now.
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.tracker.release_owned(&self.key, &self.handle);
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "https://example.com/items";

    #[test]
    fn test_register_and_release() {
        let tracker = InFlightTracker::new();
        assert!(!tracker.is_active(KEY));

        let handle = tracker.register(KEY);
        assert!(tracker.is_active(KEY));
        assert!(!handle.is_triggered());

        tracker.release(KEY);
        assert!(!tracker.is_active(KEY));
    }

    #[test]
    fn test_release_is_idempotent() {
        let tracker = InFlightTracker::new();
        tracker.release(KEY);
        tracker.register(KEY);
        tracker.release(KEY);
        tracker.release(KEY);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_try_register_rejects_duplicate() {
        let tracker = InFlightTracker::new();
        let _guard = tracker.try_register(KEY).unwrap();

        let err = tracker.try_register(KEY).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_explicit_release_then_drop_releases_once() {
        let tracker = InFlightTracker::new();
        let guard = tracker.try_register(KEY).unwrap();
        guard.release();
        assert!(!tracker.is_active(KEY));

        // A new registration must survive the old guard being gone.
        let _second = tracker.try_register(KEY).unwrap();
        assert!(tracker.is_active(KEY));
    }

    #[test]
    fn test_stale_guard_does_not_remove_newer_entry() {
        let tracker = InFlightTracker::new();
        let guard = tracker.try_register(KEY).unwrap();

        // Someone force-releases and a new request takes the key.
        tracker.release(KEY);
        let newer = tracker.register(KEY);

        drop(guard);
        assert!(tracker.is_active(KEY));
        assert!(tracker.cancel(KEY));
        assert!(newer.is_triggered());
    }

    #[test]
    fn test_cancel_triggers_without_releasing() {
        let tracker = InFlightTracker::new();
        let guard = tracker.try_register(KEY).unwrap();

        assert!(tracker.cancel(KEY));
        assert!(guard.handle().is_triggered());
        assert!(tracker.is_active(KEY));

        drop(guard);
        assert!(!tracker.cancel(KEY));
    }

    #[test]
    fn test_cancel_all() {
        let tracker = InFlightTracker::new();
        let a = tracker.try_register("https://a").unwrap();
        let b = tracker.try_register("https://b").unwrap();

        assert_eq!(tracker.cancel_all(), 2);
        assert!(a.handle().is_triggered());
        assert!(b.handle().is_triggered());

        let mut keys = tracker.active_keys();
        keys.sort();
        assert_eq!(keys, vec!["https://a".to_string(), "https://b".to_string()]);
    }
}
