//! 可取消的后台任务
//!
//! Timers that drive order status are spawned through [`spawn_cancellable`].
//! The returned [`TaskHandle`] is kept by whoever owns the state the task
//! mutates, and `cancel()` is called on every state-clearing command.

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a spawned, cancellable task
///
/// Dropping the handle does not stop the task; call [`TaskHandle::cancel`].
#[derive(Debug)]
pub struct TaskHandle {
    /// 任务名称
    name: &'static str,
    /// 取消令牌
    token: CancellationToken,
    /// 任务句柄
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancel the task.
    ///
    /// Synchronous: after this returns the task will not be polled again, so
    /// it cannot make further progress past its current await point.
    pub fn cancel(&self) {
        self.token.cancel();
        self.handle.abort();
        tracing::debug!(task = %self.name, "Task cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawn a task on the current Tokio runtime.
///
/// `make` receives the task's cancellation token; the task is also raced
/// against it, so long sleeps end as soon as the token fires. Panics inside
/// the task are caught and logged instead of being lost with the JoinHandle.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_cancellable<F, Fut>(name: &'static str, make: F) -> TaskHandle
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let token = CancellationToken::new();
    let future = make(token.clone());
    let guard = token.clone();

    let wrapped_future = async move {
        tokio::select! {
            biased;
            _ = guard.cancelled() => {
                tracing::debug!(task = %name, "Task stopped by cancellation");
            }
            result = AssertUnwindSafe(future).catch_unwind() => {
                if let Err(panic_info) = result {
                    let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(
                        task = %name,
                        panic = %panic_msg,
                        "Background task panicked! This is a bug that should be reported."
                    );
                }
            }
        }
    };

    let handle = tokio::spawn(wrapped_future);
    tracing::debug!(task = %name, "Spawned background task");
    TaskHandle {
        name,
        token,
        handle,
    }
}
