//! Sync settings model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Policy name forwarded to the server on push.
///
/// Only `server_wins` has defined client behavior (the pulled dataset always
/// replaces the cache). Unrecognized names are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConflictStrategy {
    #[default]
    ServerWins,
    ClientWins,
    Other(String),
}

impl ConflictStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ServerWins => "server_wins",
            Self::ClientWins => "client_wins",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ConflictStrategy {
    fn from(value: String) -> Self {
        match value.trim() {
            "server_wins" => Self::ServerWins,
            "client_wins" => Self::ClientWins,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for ConflictStrategy {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ConflictStrategy> for String {
    fn from(value: ConflictStrategy) -> Self {
        match value {
            ConflictStrategy::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-scope sync configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Whether pending local edits are pushed before pulling
    #[serde(default)]
    pub upload_enabled: bool,
    /// Conflict policy sent with each push
    #[serde(default)]
    pub conflict_strategy: ConflictStrategy,
    /// Time of the last successful pull
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl SyncSettings {
    /// Move `last_sync_at` forward to `at`.
    ///
    /// Never moves it backwards; use [`SyncSettings::reset_last_sync`] for that.
    /// Returns whether the timestamp changed.
    pub fn advance_last_sync(&mut self, at: DateTime<Utc>) -> bool {
        match self.last_sync_at {
            Some(current) if current == at => false,
            Some(current) if current > at => {
                tracing::debug!(
                    "Ignoring sync timestamp {} older than current {}",
                    at.to_rfc3339(),
                    current.to_rfc3339()
                );
                false
            }
            _ => {
                self.last_sync_at = Some(at);
                true
            }
        }
    }

    pub fn reset_last_sync(&mut self) {
        self.last_sync_at = None;
    }
}
