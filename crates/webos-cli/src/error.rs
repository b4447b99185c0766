use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] webos_core::Error),
    #[error(transparent)]
    Api(#[from] webos_core::ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Move failed: {0}")]
    MoveRejected(String),
    #[error("Nothing to change. Pass --upload-enabled and/or --conflict-strategy.")]
    NothingToChange,
}
