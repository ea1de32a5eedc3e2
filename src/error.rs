//! Error types.
//!
//! Store actions never fail. Errors only come from building a store outside
//! a tokio runtime, or from loading or validating configuration.

use std::path::PathBuf;

/// Errors raised while constructing a [`CounterStore`](crate::CounterStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no tokio runtime is running; use CounterStore::with_runtime")]
    NoRuntime,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while loading a [`CounterConfig`](crate::CounterConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config from {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
