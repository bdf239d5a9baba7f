//! CLI error types.

use rush_core::prelude::{ConfigError, PlannerError};
use thiserror::Error;

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Everything that can stop a CLI command.
#[derive(Error, Debug)]
pub enum CliError {
    /// The planner rejected the config or failed mid-search.
    #[error(transparent)]
    Planner(#[from] PlannerError),

    /// A config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing output failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed.
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The sweep thread pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
