use serde::Serialize;
use webos_core::models::Membership;
use webos_core::{Scope, TenantApi};

use crate::commands::common::CommandContext;
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct TenantListItem {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub role: String,
    pub is_default: bool,
    /// Whether commands act for this tenant
    pub current: bool,
}

/// The tenant a scope resolves to. A scope without a tenant id acts for the
/// user's default membership.
fn is_current(membership: &Membership, scope: &Scope) -> bool {
    if scope.has_default_tenant() {
        membership.is_default
    } else {
        membership.tenant.scope_id() == scope.tenant_id()
    }
}

pub fn membership_to_list_item(membership: &Membership, scope: &Scope) -> TenantListItem {
    TenantListItem {
        id: membership.tenant.id,
        name: membership.tenant.name.clone(),
        slug: membership.tenant.slug.clone(),
        role: membership.role.clone(),
        is_default: membership.is_default,
        current: is_current(membership, scope),
    }
}

pub fn format_membership_lines(memberships: &[Membership], scope: &Scope) -> Vec<String> {
    if memberships.is_empty() {
        return vec!["Not a member of any tenant.".to_string()];
    }

    memberships
        .iter()
        .map(|membership| {
            let marker = if is_current(membership, scope) { "*" } else { " " };
            let default = if membership.is_default { "  default" } else { "" };
            format!(
                "{} {:>6}  {:<16} {:<10}{}",
                marker,
                membership.tenant.id,
                membership.tenant.slug,
                membership.role,
                default
            )
            .trim_end()
            .to_string()
        })
        .collect()
}

pub async fn run_tenants(context: &CommandContext, as_json: bool) -> Result<(), CliError> {
    let memberships = context.api()?.list_memberships().await?;

    if as_json {
        let json_items = memberships
            .iter()
            .map(|membership| membership_to_list_item(membership, &context.scope))
            .collect::<Vec<TenantListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_membership_lines(&memberships, &context.scope) {
            println!("{line}");
        }
    }

    Ok(())
}
