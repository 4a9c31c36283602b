//! Trailing-edge debouncing for interactive work.
//!
//! Repeated calls within the delay window collapse to the last one. Requires a
//! running tokio runtime.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Wraps an action so that bursts of calls only run it once, with the last value.
pub struct Debouncer<T> {
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Creates a debouncer that runs `action` once `delay` has passed without a new call.
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    /// Schedules the action with `value`, replacing any call still waiting.
    pub fn call(&self, value: T) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let action = Arc::clone(&self.action);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(value);
        }));
    }

    /// Drops the waiting call, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }

    /// Returns true while a call is waiting for its window to close.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// The configured delay window.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<AtomicUsize>, Arc<Mutex<Option<i32>>>, impl Fn(i32) + Send + Sync + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(None));
        let (c, l) = (Arc::clone(&calls), Arc::clone(&last));
        let action = move |v: i32| {
            c.fetch_add(1, Ordering::SeqCst);
            *l.lock().unwrap() = Some(v);
        };
        (calls, last, action)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_call() {
        let (calls, last, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(100), action);

        debouncer.call(1);
        debouncer.call(2);
        debouncer.call(3);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), Some(3));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_each_fire() {
        let (calls, last, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(100), action);

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*last.lock().unwrap(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_waiting_call() {
        let (calls, _last, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(100), action);

        debouncer.call(1);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
