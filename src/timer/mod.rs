//! Cancellable repeating timers.
//!
//! - `CancelToken`: shared cancellation flag with an async wait
//! - `TaskCounter`: live-task bookkeeping
//! - `Ticker`: a tokio task that waits a period and ticks until cancelled

mod cancel;
mod ticker;

pub use cancel::{CancelToken, TaskCounter, TaskGuard};
pub use ticker::Ticker;
