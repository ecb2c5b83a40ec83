use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Quiet period after the last url edit before the url is analyzed.
pub const ANALYSIS_DEBOUNCE: Duration = Duration::from_millis(800);

/// Runs a task once input has been quiet for `delay`.
///
/// Every `schedule` call aborts the previously armed timer, so at most one
/// timer is pending. Once a timer fires its task is spawned on its own and a
/// later `schedule` does not cancel it.
pub struct Debouncer {
    delay: Duration,
    handle: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration, handle: Handle) -> Self {
        Self {
            delay,
            handle,
            pending: Mutex::new(None),
        }
    }

    /// Re-arm the timer with `task`.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let delay = self.delay;
        let handle = self.handle.clone();
        *pending = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            handle.spawn(task);
        }));
    }

    /// Drop the armed timer, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
