//! CLI error type bridging the engine, config, and I/O failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Analytics(#[from] trafikvakt_engine::AnalyticsError),

    #[error(transparent)]
    Config(#[from] trafikvakt_config::ConfigError),

    #[error(transparent)]
    Storage(#[from] trafikvakt_storage::StorageError),

    #[error("dataset error: {0}")]
    Dataset(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
