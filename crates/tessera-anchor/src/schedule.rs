//! Cancellable delayed tasks.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay.
///
/// Implementations must not run the task inline from `schedule`.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> CancelHandle;
}

/// Cancels one scheduled task.
///
/// Dropping the handle detaches the task; it still runs.
#[must_use = "dropping a CancelHandle detaches the task"]
pub struct CancelHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl CancelHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle for a task that cannot be cancelled.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Cancel the task if it has not run yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

/// [`Scheduler`] backed by tokio timers.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Scheduler on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    #[must_use]
    pub fn current() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    #[must_use]
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> CancelHandle {
        // Deadline is fixed now, not when the spawned task is first polled.
        let deadline = Instant::now() + delay;
        let join = self.handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            task();
        });
        let abort = join.abort_handle();
        CancelHandle::new(move || abort.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static_assertions::assert_impl_all!(TokioScheduler: Send, Sync);
    static_assertions::assert_impl_all!(CancelHandle: Send);

    fn counter_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let scheduler = TokioScheduler::current();
        let counter = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.schedule(Duration::from_millis(100), counter_task(&counter));

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let scheduler = TokioScheduler::current();
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.schedule(Duration::from_millis(100), counter_task(&counter));

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_detaches() {
        let scheduler = TokioScheduler::current();
        let counter = Arc::new(AtomicUsize::new(0));
        drop(scheduler.schedule(Duration::from_millis(10), counter_task(&counter)));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_detached_handle_cancel_is_noop() {
        CancelHandle::detached().cancel();
    }
}
