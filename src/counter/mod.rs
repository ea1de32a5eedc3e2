//! The counter screen's state and the store that owns it.

mod state;
mod store;

pub use state::{AutoMode, CounterState};
pub use store::CounterStore;
