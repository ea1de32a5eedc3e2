//! Observable snapshot stores.
//!
//! A store owns one value, hands out clones of it, and pushes every change
//! to callback subscribers and latest-value watch receivers.

mod store;

pub use store::{Store, Subscription};
