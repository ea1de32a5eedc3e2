//! Counter configuration.
//!
//! Configuration is plain TOML. Every key is optional:
//!
//! ```toml
//! default_interval_ms = 3000
//! min_interval_secs = 1
//! max_interval_secs = 8
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default delay between automatic increments.
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Settings consumed by [`CounterStore`](crate::CounterStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Interval a freshly created store starts with.
    pub default_interval_ms: u64,
    /// Lower bound of the settings slider, in seconds.
    pub min_interval_secs: u64,
    /// Upper bound of the settings slider, in seconds.
    pub max_interval_secs: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: DEFAULT_INTERVAL_MS,
            min_interval_secs: 1,
            max_interval_secs: 8,
        }
    }
}

impl CounterConfig {
    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: CounterConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check that the interval is positive and the slider range is non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_interval_ms == 0 {
            return Err(ConfigError::Invalid("default_interval_ms must be positive".into()));
        }
        if self.min_interval_secs == 0 {
            return Err(ConfigError::Invalid("min_interval_secs must be positive".into()));
        }
        if self.min_interval_secs > self.max_interval_secs {
            return Err(ConfigError::Invalid(format!(
                "min_interval_secs ({}) exceeds max_interval_secs ({})",
                self.min_interval_secs, self.max_interval_secs
            )));
        }
        Ok(())
    }

    /// Slider range described by this config.
    pub fn interval_range(&self) -> IntervalRange {
        IntervalRange {
            min: self.min_interval_secs,
            max: self.max_interval_secs,
        }
    }
}

/// Inclusive range of interval seconds the settings control offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalRange {
    pub min: u64,
    pub max: u64,
}

impl IntervalRange {
    /// Whether `secs` lies within the range.
    pub fn contains(&self, secs: i64) -> bool {
        secs >= 0 && (self.min..=self.max).contains(&(secs as u64))
    }

    /// Pull `secs` into the range; negative values map to `min`.
    pub fn clamp(&self, secs: i64) -> u64 {
        if secs < 0 {
            return self.min;
        }
        (secs as u64).max(self.min).min(self.max)
    }

    /// Number of stops strictly between the two ends of a slider.
    pub fn steps(&self) -> u64 {
        self.max.saturating_sub(self.min).saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_slider() {
        let config = CounterConfig::default();
        assert_eq!(config.default_interval_ms, 3000);
        let range = config.interval_range();
        assert_eq!(range, IntervalRange { min: 1, max: 8 });
        assert_eq!(range.steps(), 6);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = CounterConfig::from_toml_str("default_interval_ms = 1500").unwrap();
        assert_eq!(config.default_interval_ms, 1500);
        assert_eq!(config.max_interval_secs, 8);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = CounterConfig::from_toml_str("min_interval_secs = 9").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = CounterConfig::from_toml_str("default_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = CounterConfig::from_toml_str("default_interval_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_default() {
        let config = CounterConfig::load("/nonexistent/counterplus.toml").unwrap();
        assert_eq!(config, CounterConfig::default());
    }

    #[test]
    fn clamp_and_contains() {
        let range = IntervalRange { min: 1, max: 8 };
        assert_eq!(range.clamp(0), 1);
        assert_eq!(range.clamp(-4), 1);
        assert_eq!(range.clamp(5), 5);
        assert_eq!(range.clamp(20), 8);
        assert!(range.contains(8));
        assert!(!range.contains(0));
        assert!(!range.contains(-1));
    }
}
