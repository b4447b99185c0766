//! Tenant/user scope that partitions every cached record

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::normalize_text_option;

/// Placeholder used when a tenant or user id is missing.
pub const DEFAULT_SCOPE_PART: &str = "default";

/// The `(tenant_id, user_id)` pair all local data is namespaced by.
///
/// Both parts are trimmed; missing or blank values collapse to `"default"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    tenant_id: String,
    user_id: String,
}

impl Scope {
    /// Build a scope from raw ids
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::from_options(Some(tenant_id.into()), Some(user_id.into()))
    }

    /// Build a scope from optional ids, falling back to `"default"`
    pub fn from_options(tenant_id: Option<String>, user_id: Option<String>) -> Self {
        Self {
            tenant_id: normalize_text_option(tenant_id)
                .unwrap_or_else(|| DEFAULT_SCOPE_PART.to_string()),
            user_id: normalize_text_option(user_id)
                .unwrap_or_else(|| DEFAULT_SCOPE_PART.to_string()),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the tenant part is the `"default"` placeholder
    pub fn has_default_tenant(&self) -> bool {
        self.tenant_id == DEFAULT_SCOPE_PART
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::from_options(None, None)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tenant_id, self.user_id)
    }
}
