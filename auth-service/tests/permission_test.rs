//! Integration tests for permission resolution.
//!
//! Every deny branch must collapse to the same `false` a caller sees for a
//! plain missing assignment.

mod common;

use auth_service::models::Action;
use auth_service::services::RoleActionCatalog;
use common::{permission_service, seed_member_with_action, seed_member_without_actions, store};
use uuid::Uuid;

// ============================================================================
// Grant / revoke
// ============================================================================

#[tokio::test]
async fn member_with_assigned_action_is_allowed() {
    let store = store();
    let org = Uuid::new_v4();
    let (member, _) = seed_member_with_action(&store, org, "expense_delete").await;
    let resolver = permission_service(&store);

    assert!(
        resolver
            .has_permission(member.member_id, org, "expense_delete")
            .await
    );
}

#[tokio::test]
async fn revoking_the_assignment_revokes_the_permission() {
    let store = store();
    let org = Uuid::new_v4();
    let (member, action) = seed_member_with_action(&store, org, "expense_delete").await;
    let resolver = permission_service(&store);

    assert!(
        resolver
            .has_permission(member.member_id, org, "expense_delete")
            .await
    );

    store
        .revoke_action_from_role(member.role_id, action.action_id)
        .await
        .unwrap();

    assert!(
        !resolver
            .has_permission(member.member_id, org, "expense_delete")
            .await
    );
}

#[tokio::test]
async fn role_without_the_assignment_is_denied() {
    let store = store();
    let org = Uuid::new_v4();
    let member = seed_member_without_actions(&store, org).await;

    // The action exists in the catalog; the member's role just lacks it.
    let action = Action::new("expense_delete".to_string(), None);
    store.insert_action(&action).await.unwrap();

    let resolver = permission_service(&store);
    assert!(
        !resolver
            .has_permission(member.member_id, org, "expense_delete")
            .await
    );
}

// ============================================================================
// Fail-closed branches
// ============================================================================

#[tokio::test]
async fn unknown_member_is_denied() {
    let store = store();
    let resolver = permission_service(&store);

    assert!(
        !resolver
            .has_permission(Uuid::new_v4(), Uuid::new_v4(), "expense_delete")
            .await
    );
}

#[tokio::test]
async fn cross_organization_member_id_is_denied() {
    let store = store();
    let home_org = Uuid::new_v4();
    let other_org = Uuid::new_v4();
    let (member, _) = seed_member_with_action(&store, home_org, "expense_delete").await;
    let resolver = permission_service(&store);

    // Allowed at home...
    assert!(
        resolver
            .has_permission(member.member_id, home_org, "expense_delete")
            .await
    );

    // ...but the same member id probing another tenant is denied, even
    // though the role assignment would allow the action.
    assert!(
        !resolver
            .has_permission(member.member_id, other_org, "expense_delete")
            .await
    );
}

#[tokio::test]
async fn unregistered_action_name_is_denied() {
    let store = store();
    let org = Uuid::new_v4();
    let (member, _) = seed_member_with_action(&store, org, "expense_delete").await;
    let resolver = permission_service(&store);

    assert!(
        !resolver
            .has_permission(member.member_id, org, "expense_obliterate")
            .await
    );
}
