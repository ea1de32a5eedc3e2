//! # Counterplus
//!
//! An observable counter with an auto-increment timer.
//!
//! ## Store (generic observable state)
//!
//! - `Store<T>` - Thread-safe snapshot container
//! - Callback subscribers that see the current value, then every change in order
//! - Latest-value `watch` receivers for async consumers
//!
//! ## Counter
//!
//! - `CounterState` - Immutable snapshot: count, auto mode, interval, settings flag
//! - `CounterStore` - Owns the state and the single auto-increment timer
//!
//! ## Timer
//!
//! - `Ticker` - Repeating tokio task that re-reads its period before each wait
//! - `CancelToken` - Cancellation checked under the store lock, so a stopped
//!   timer never increments

pub mod config;
pub mod counter;
pub mod error;
pub mod logging;
pub mod store;
pub mod timer;

// Re-export main types for convenience
pub use config::{CounterConfig, IntervalRange};
pub use counter::{AutoMode, CounterState, CounterStore};
pub use error::{ConfigError, StoreError};
pub use store::{Store, Subscription};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_works() {
        // Basic smoke test
        let store = CounterStore::try_default().unwrap();
        assert_eq!(store.state(), CounterState::default());
        store.increment();
        assert_eq!(store.state().count, 1);
    }
}
