use std::fmt;
use std::time::Duration;

use crate::config::DEFAULT_INTERVAL_MS;

/// Immutable snapshot of the counter screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    /// Current count. Goes negative freely and wraps at the `i64` limits.
    pub count: i64,
    /// True exactly while an auto-increment timer is active.
    pub is_auto_incrementing: bool,
    /// Delay between automatic increments, always positive.
    pub auto_increment_interval_ms: u64,
    /// Whether the settings dialog should be shown.
    pub show_settings: bool,
}

impl Default for CounterState {
    fn default() -> Self {
        Self::with_interval(DEFAULT_INTERVAL_MS)
    }
}

impl CounterState {
    /// Initial snapshot with the given interval and everything else zeroed.
    pub fn with_interval(interval_ms: u64) -> Self {
        Self {
            count: 0,
            is_auto_incrementing: false,
            auto_increment_interval_ms: interval_ms,
            show_settings: false,
        }
    }

    /// Snapshot with the count raised by one. Wraps at `i64::MAX`.
    pub fn incremented(&self) -> Self {
        Self {
            count: self.count.wrapping_add(1),
            ..*self
        }
    }

    /// Snapshot with the count lowered by one. Wraps at `i64::MIN`.
    pub fn decremented(&self) -> Self {
        Self {
            count: self.count.wrapping_sub(1),
            ..*self
        }
    }

    /// Interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.auto_increment_interval_ms)
    }

    /// Interval in whole seconds, as the settings dialog presents it.
    pub fn interval_secs(&self) -> u64 {
        self.auto_increment_interval_ms / 1000
    }

    /// Whether the auto-increment subsystem is idle or running.
    pub fn auto_mode(&self) -> AutoMode {
        if self.is_auto_incrementing {
            AutoMode::Running
        } else {
            AutoMode::Idle
        }
    }
}

/// State of the auto-increment subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoMode {
    Idle,
    Running,
}

impl fmt::Display for AutoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoMode::Idle => write!(f, "OFF"),
            AutoMode::Running => write!(f, "ON"),
        }
    }
}
