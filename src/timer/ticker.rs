use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::cancel::{CancelToken, TaskCounter};

/// A repeating background task: wait one period, tick, repeat.
///
/// The period is asked for afresh before every wait, so a change made
/// between ticks applies to the next cycle. The task stops when its token is
/// cancelled, when the period source returns `None`, or when the tick
/// callback returns `false`. Dropping the `Ticker` cancels it.
pub struct Ticker {
    token: CancelToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a ticker onto `runtime`.
    ///
    /// `on_tick` receives the ticker's token so the callback can re-check
    /// cancellation under whatever lock guards the state it mutates.
    pub fn spawn<P, F>(runtime: &Handle, tasks: &TaskCounter, period: P, on_tick: F) -> Self
    where
        P: Fn() -> Option<Duration> + Send + 'static,
        F: Fn(&CancelToken) -> bool + Send + 'static,
    {
        let token = CancelToken::new();
        let guard = tasks.enter();
        let task_token = token.clone();

        let handle = runtime.spawn(async move {
            let _guard = guard;
            loop {
                let Some(period) = period() else {
                    break;
                };
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = tokio::time::sleep(period) => {}
                }
                if task_token.is_cancelled() || !on_tick(&task_token) {
                    break;
                }
            }
        });

        Self { token, handle }
    }

    /// Stop the ticker. A wait in progress is abandoned.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the background task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
