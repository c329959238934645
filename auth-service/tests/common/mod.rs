//! Test helper module for the authorization and verification core.
//!
//! Builds fully in-process fixtures over `MemoryStore`; no external
//! services required.

#![allow(dead_code)]

use auth_service::models::{Action, Member, Role, VerificationCode};
use auth_service::services::{
    AccountService, MembershipDirectory, MemoryStore, MockCodeGenerator, PermissionService,
    RoleActionCatalog, VerificationCodeService, VerificationCodeStore,
};
use auth_service::utils::Argon2Hasher;
use std::sync::Arc;
use uuid::Uuid;

pub const CODE_TTL_SECONDS: i64 = 3600;

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

pub fn permission_service(store: &Arc<MemoryStore>) -> PermissionService {
    PermissionService::new(store.clone(), store.clone())
}

pub fn verification_service(
    store: &Arc<MemoryStore>,
    generator: MockCodeGenerator,
) -> VerificationCodeService {
    VerificationCodeService::new(store.clone(), Arc::new(generator), CODE_TTL_SECONDS)
}

pub fn account_service(store: &Arc<MemoryStore>, generator: MockCodeGenerator) -> AccountService {
    AccountService::new(
        store.clone(),
        verification_service(store, generator),
        Arc::new(Argon2Hasher),
    )
}

/// Seed a role, an action named `action_name`, and a member of
/// `organization_id` whose role has that action granted.
pub async fn seed_member_with_action(
    store: &Arc<MemoryStore>,
    organization_id: Uuid,
    action_name: &str,
) -> (Member, Action) {
    let role = Role::new("treasurer".to_string(), None);
    store.insert_role(&role).await.unwrap();

    let action = Action::new(action_name.to_string(), None);
    store.insert_action(&action).await.unwrap();

    store
        .grant_action_to_role(role.role_id, action.action_id)
        .await
        .unwrap();

    let member = Member::new(organization_id, Uuid::new_v4(), role.role_id);
    store.insert_member(&member).await.unwrap();

    (member, action)
}

/// Seed a member whose role exists but has no actions granted.
pub async fn seed_member_without_actions(
    store: &Arc<MemoryStore>,
    organization_id: Uuid,
) -> Member {
    let role = Role::new("observer".to_string(), None);
    store.insert_role(&role).await.unwrap();

    let member = Member::new(organization_id, Uuid::new_v4(), role.role_id);
    store.insert_member(&member).await.unwrap();
    member
}

/// Insert an already-expired, unused code directly into the store.
pub async fn seed_expired_code(
    store: &Arc<MemoryStore>,
    email: &str,
    code_text: &str,
) -> VerificationCode {
    let mut code =
        VerificationCode::new(email.to_string(), code_text.to_string(), CODE_TTL_SECONDS);
    code.expire_at = chrono::Utc::now().timestamp() - 10;
    store.insert_code(&code).await.unwrap();
    code
}
