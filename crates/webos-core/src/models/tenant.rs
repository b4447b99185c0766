//! Tenants the signed-in user belongs to

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const fn active_by_default() -> bool {
    true
}

impl Tenant {
    /// Value to send as `X-Tenant-Id` (and to use as the scope's tenant)
    pub fn scope_id(&self) -> String {
        self.id.to_string()
    }
}

/// The user's role in one tenant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub tenant: Tenant,
    #[serde(default)]
    pub role: String,
    /// The tenant the server falls back to when no header is sent
    #[serde(default)]
    pub is_default: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
