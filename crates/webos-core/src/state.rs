//! Shared state types.

use std::fmt;

use serde::Serialize;

/// Phase of one sync cycle: `idle → pushing → pulling → settled`.
///
/// `pushing` is skipped when uploads are disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    Idle,
    Pushing,
    Pulling,
    Settled,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Pushing => "pushing",
            Self::Pulling => "pulling",
            Self::Settled => "settled",
        };
        f.write_str(label)
    }
}
