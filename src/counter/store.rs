use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info};

use super::state::CounterState;
use crate::config::{CounterConfig, IntervalRange};
use crate::error::StoreError;
use crate::store::{Store, Subscription};
use crate::timer::{CancelToken, TaskCounter, Ticker};

struct Inner {
    state: Store<CounterState>,
    // Every mutation and every timer start/stop happens under this lock.
    // `Some` exactly when `is_auto_incrementing` is set.
    timer: Mutex<Option<Ticker>>,
    tasks: TaskCounter,
    runtime: Handle,
    range: IntervalRange,
}

impl Inner {
    fn start_timer(self: &Arc<Self>, timer: &mut Option<Ticker>) {
        if let Some(previous) = timer.take() {
            previous.cancel();
        }

        let for_period: Weak<Inner> = Arc::downgrade(self);
        let for_tick: Weak<Inner> = Arc::downgrade(self);
        let ticker = Ticker::spawn(
            &self.runtime,
            &self.tasks,
            move || {
                for_period
                    .upgrade()
                    .map(|inner| inner.state.read(CounterState::interval))
            },
            move |token| match for_tick.upgrade() {
                Some(inner) => inner.tick(token),
                None => false,
            },
        );

        info!(
            interval_ms = self.state.read(|s| s.auto_increment_interval_ms),
            "auto-increment started"
        );
        *timer = Some(ticker);
    }

    fn stop_timer(&self, timer: &mut Option<Ticker>) {
        if let Some(ticker) = timer.take() {
            ticker.cancel();
            info!("auto-increment stopped");
        }
    }

    fn tick(&self, token: &CancelToken) -> bool {
        let _timer = self.timer.lock();
        if token.is_cancelled() {
            return false;
        }
        self.state.update(|s| *s = s.incremented());
        debug!("auto-incremented to {}", self.state.read(|s| s.count));
        true
    }

    fn set_interval_ms(self: &Arc<Self>, interval_ms: u64) {
        let mut timer = self.timer.lock();
        self.state.update(|s| s.auto_increment_interval_ms = interval_ms);
        debug!(interval_ms, "interval updated");

        // Restarting discards the elapsed part of the current wait.
        if self.state.read(|s| s.is_auto_incrementing) {
            self.start_timer(&mut timer);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(ticker) = self.timer.get_mut().take() {
            ticker.cancel();
            debug!("counter store dropped; auto-increment cancelled");
        }
    }
}

/// Owns the counter state and the lifecycle of its auto-increment timer.
///
/// Actions are synchronous and infallible. The timer runs as a task on the
/// tokio runtime the store was built with and is cancelled when the store
/// is dropped.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use counterplus::{CounterConfig, CounterStore};
///
/// let store = CounterStore::new(CounterConfig::default()).unwrap();
/// store.increment();
/// store.increment();
/// store.decrement();
/// assert_eq!(store.state().count, 1);
/// # }
/// ```
pub struct CounterStore {
    inner: Arc<Inner>,
}

impl CounterStore {
    /// Build a store on the tokio runtime of the calling context.
    pub fn new(config: CounterConfig) -> Result<Self, StoreError> {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        Self::with_runtime(runtime, config)
    }

    /// Build a store with the default configuration.
    pub fn try_default() -> Result<Self, StoreError> {
        Self::new(CounterConfig::default())
    }

    /// Build a store whose timer tasks are spawned onto `runtime`.
    ///
    /// Fails if `config` does not pass [`CounterConfig::validate`].
    pub fn with_runtime(runtime: Handle, config: CounterConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let initial = CounterState::with_interval(config.default_interval_ms);
        Ok(Self {
            inner: Arc::new(Inner {
                state: Store::new(initial),
                timer: Mutex::new(None),
                tasks: TaskCounter::new(),
                runtime,
                range: config.interval_range(),
            }),
        })
    }

    /// Current snapshot.
    pub fn state(&self) -> CounterState {
        self.inner.state.get()
    }

    /// Receive the current snapshot now and every change after it.
    ///
    /// The callback runs while the store is locked and must not call back
    /// into this store.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CounterState) + Send + Sync + 'static,
    {
        self.inner.state.subscribe(callback)
    }

    /// Latest-value receiver for async consumers.
    pub fn watch(&self) -> watch::Receiver<CounterState> {
        self.inner.state.watch()
    }

    /// Slider range offered by the settings dialog.
    pub fn interval_range(&self) -> IntervalRange {
        self.inner.range
    }

    /// Add one to the count.
    pub fn increment(&self) {
        let _timer = self.inner.timer.lock();
        self.inner.state.update(|s| *s = s.incremented());
        debug!("increment");
    }

    /// Subtract one from the count. The count may go negative.
    pub fn decrement(&self) {
        let _timer = self.inner.timer.lock();
        self.inner.state.update(|s| *s = s.decremented());
        debug!("decrement");
    }

    /// Stop auto-increment if running and zero the count.
    pub fn reset(&self) {
        let mut timer = self.inner.timer.lock();
        self.inner.stop_timer(&mut timer);
        self.inner.state.update(|s| {
            s.count = 0;
            s.is_auto_incrementing = false;
        });
        debug!("reset");
    }

    /// Start auto-increment when idle, stop it when running.
    pub fn toggle_auto_increment(&self) {
        let mut timer = self.inner.timer.lock();
        let running = self.inner.state.read(|s| s.is_auto_incrementing);
        self.inner.state.update(|s| s.is_auto_incrementing = !running);

        if running {
            self.inner.stop_timer(&mut timer);
        } else {
            self.inner.start_timer(&mut timer);
        }
    }

    /// Ask for the settings dialog to be shown.
    pub fn open_settings(&self) {
        let _timer = self.inner.timer.lock();
        self.inner.state.update(|s| s.show_settings = true);
    }

    /// Hide the settings dialog.
    pub fn close_settings(&self) {
        let _timer = self.inner.timer.lock();
        self.inner.state.update(|s| s.show_settings = false);
    }

    /// Set the auto-increment interval in seconds.
    ///
    /// Non-positive values are ignored. While running, the timer restarts so
    /// the new interval applies from now.
    pub fn update_interval(&self, seconds: i64) {
        match seconds.checked_mul(1000).filter(|ms| *ms > 0) {
            Some(ms) => self.inner.set_interval_ms(ms as u64),
            None => debug!(seconds, "ignoring invalid interval"),
        }
    }

    /// Save action of the settings dialog: clamp to the slider range, apply
    /// the interval and close the dialog.
    pub fn apply_settings(&self, seconds: i64) {
        match self.inner.range.clamp(seconds).checked_mul(1000).filter(|ms| *ms > 0) {
            Some(ms) => self.inner.set_interval_ms(ms),
            None => debug!(seconds, "ignoring invalid interval"),
        }
        self.close_settings();
    }

    /// Number of timer tasks still alive. A cancelled task counts until it
    /// has observed its cancellation.
    pub fn running_timers(&self) -> usize {
        self.inner.tasks.count()
    }

    /// Cancel auto-increment, leaving the count untouched.
    pub fn shutdown(&self) {
        let mut timer = self.inner.timer.lock();
        self.inner.stop_timer(&mut timer);
        self.inner.state.update(|s| s.is_auto_incrementing = false);
    }

    #[cfg(test)]
    fn timer_matches_flag(&self) -> bool {
        let timer = self.inner.timer.lock();
        timer.is_some() == self.inner.state.read(|s| s.is_auto_incrementing)
    }
}
