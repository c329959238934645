//! Permission resolution over the member → role → role-action → action chain.

use std::sync::Arc;
use uuid::Uuid;

use crate::services::store::{MembershipDirectory, RoleActionCatalog};

/// Read-only permission resolver.
///
/// Holds no mutable state of its own; every resolution is a fresh walk of
/// the membership directory and the role/action catalog.
#[derive(Clone)]
pub struct PermissionService {
    directory: Arc<dyn MembershipDirectory>,
    catalog: Arc<dyn RoleActionCatalog>,
}

impl PermissionService {
    pub fn new(directory: Arc<dyn MembershipDirectory>, catalog: Arc<dyn RoleActionCatalog>) -> Self {
        Self { directory, catalog }
    }

    /// Resolve whether `member_id` may perform `action_name` inside
    /// `organization_id`.
    ///
    /// Fail-closed: a missing member, a cross-organization member id, an
    /// unregistered action name, a missing role-action assignment, and a
    /// storage failure all collapse to `false`. Callers cannot distinguish
    /// "not found" from "not permitted" - each branch logs its own reason
    /// for the audit trail instead.
    pub async fn has_permission(
        &self,
        member_id: Uuid,
        organization_id: Uuid,
        action_name: &str,
    ) -> bool {
        let member = match self.directory.find_member_by_id(member_id).await {
            Ok(Some(member)) => member,
            Ok(None) => {
                tracing::warn!(%member_id, action = %action_name, "Permission denied: member not found");
                return false;
            }
            Err(e) => {
                tracing::error!(%member_id, error = %e, "Permission denied: membership lookup failed");
                return false;
            }
        };

        // Tenant isolation: a member id minted in one organization must not
        // resolve permissions in another, even if it is otherwise valid.
        if !member.belongs_to(organization_id) {
            tracing::warn!(
                %member_id,
                %organization_id,
                member_organization = %member.organization_id,
                "Permission denied: member does not belong to organization"
            );
            return false;
        }

        let action = match self.catalog.find_action_by_name(action_name).await {
            Ok(Some(action)) => action,
            Ok(None) => {
                // Unknown actions are never implicitly granted.
                tracing::warn!(%member_id, action = %action_name, "Permission denied: action not registered");
                return false;
            }
            Err(e) => {
                tracing::error!(%member_id, action = %action_name, error = %e, "Permission denied: action lookup failed");
                return false;
            }
        };

        match self
            .catalog
            .role_has_action(member.role_id, action.action_id)
            .await
        {
            Ok(true) => {
                tracing::debug!(%member_id, action = %action_name, role_id = %member.role_id, "Permission granted");
                true
            }
            Ok(false) => {
                tracing::warn!(%member_id, action = %action_name, role_id = %member.role_id, "Permission denied: role lacks action");
                false
            }
            Err(e) => {
                tracing::error!(%member_id, action = %action_name, error = %e, "Permission denied: assignment lookup failed");
                false
            }
        }
    }
}
