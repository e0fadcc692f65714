//! Owned task scope for deferred list work.
//!
//! # Responsibility
//! - Spawn deferred work (delayed adds, notification flows) on tokio.
//! - Tie every spawned task to the lifetime of its owner.
//!
//! # Invariants
//! - After `close()`, no task spawned by this scope keeps running.
//! - A closed scope rejects new work instead of leaking it.
//! - Dropping the scope closes it.

use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Scope-level spawn failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    /// Caller is not inside a tokio runtime context.
    RuntimeUnavailable,
    /// Scope owner was already torn down.
    Closed,
}

impl Display for ScopeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RuntimeUnavailable => write!(f, "no tokio runtime available for scoped task"),
            Self::Closed => write!(f, "task scope is closed"),
        }
    }
}

impl Error for ScopeError {}

/// Set of cancellable tasks owned by one screen-level object.
pub struct TaskScope {
    name: &'static str,
    tasks: Mutex<Vec<AbortHandle>>,
    closed: AtomicBool,
}

impl TaskScope {
    /// Creates an open scope; `name` only tags log events.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tasks: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Spawns `future` on the current runtime and tracks it for teardown.
    ///
    /// # Errors
    /// - `ScopeError::Closed` after `close()`.
    /// - `ScopeError::RuntimeUnavailable` outside a tokio runtime.
    pub fn spawn<F>(&self, future: F) -> Result<AbortHandle, ScopeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| ScopeError::RuntimeUnavailable)?;

        // `closed` is read under the tasks lock so a concurrent `close()`
        // either sees this task or this call sees the scope closed.
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_closed() {
            return Err(ScopeError::Closed);
        }
        tasks.retain(|task| !task.is_finished());
        let abort = handle.spawn(future).abort_handle();
        tasks.push(abort.clone());
        Ok(abort)
    }

    /// Number of tracked tasks that have not finished yet.
    pub fn live_tasks(&self) -> usize {
        let tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Whether `close()` has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Aborts every tracked task and rejects further spawns.
    ///
    /// Idempotent.
    pub fn close(&self) {
        let drained = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            if self.closed.swap(true, Ordering::AcqRel) {
                return;
            }
            std::mem::take(&mut *tasks)
        };
        let aborted = drained.iter().filter(|task| !task.is_finished()).count();
        for task in drained {
            task.abort();
        }
        debug!(
            "event=scope_close module=scope status=ok scope={} aborted={}",
            self.name, aborted
        );
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::{ScopeError, TaskScope};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn spawn_outside_runtime_is_rejected() {
        let scope = TaskScope::new("test");
        let err = scope.spawn(async {}).unwrap_err();
        assert_eq!(err, ScopeError::RuntimeUnavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn close_aborts_pending_tasks_and_rejects_new_work() {
        let scope = TaskScope::new("test");
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        scope
            .spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                flag.store(true, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(scope.live_tasks(), 1);

        scope.close();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!fired.load(Ordering::SeqCst));
        assert_eq!(scope.spawn(async {}).unwrap_err(), ScopeError::Closed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn close_racing_spawn_never_leaves_a_live_task() {
        for _ in 0..200 {
            let scope = Arc::new(TaskScope::new("race"));
            let closer = {
                let scope = Arc::clone(&scope);
                std::thread::spawn(move || scope.close())
            };
            let spawned = scope.spawn(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
            closer.join().expect("closer thread should not panic");

            assert!(scope.is_closed());
            if spawned.is_ok() {
                assert_eq!(scope.live_tasks(), 0, "spawned task escaped close");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn finished_tasks_are_not_counted() {
        let scope = TaskScope::new("test");
        scope.spawn(async {}).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(scope.live_tasks(), 0);
    }
}
