//! Error types for webos-core

use thiserror::Error;

use crate::api::ApiError;

/// Result type alias using webos-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the local cache, the remote API or configuration.
///
/// Store failures (`LibSql`, `Database`, `Serialization`, `Io`) are never
/// retried here; remote failures keep their [`ApiError`] shape so callers can
/// word them for the user.
#[derive(Error, Debug)]
pub enum Error {
    /// A cached record could not be read back
    #[error("Local cache error: {0}")]
    Database(String),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote API error: {0}")]
    Api(#[from] ApiError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
