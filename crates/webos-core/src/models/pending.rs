//! Pending edit queue model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::IconId;

/// Kind tag stored with each queued edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    IconUpdate,
}

impl PendingKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IconUpdate => "icon_update",
        }
    }
}

/// A locally recorded icon move, sent verbatim in a push batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconUpdate {
    pub id: IconId,
    pub x: i64,
    pub y: i64,
    pub updated_at: DateTime<Utc>,
}

/// A queued icon update paired with its store-assigned sequence id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    pub id: i64,
    pub payload: IconUpdate,
}
