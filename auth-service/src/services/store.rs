//! Storage capabilities consumed by the services.
//!
//! Every service method runs against one of these traits rather than a
//! concrete persistence technology. [`super::Database`] implements them
//! over PostgreSQL; [`MemoryStore`] implements them in process for tests
//! and local tooling.

use async_trait::async_trait;
use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{Action, Member, Role, User, VerificationCode};

/// Durable mapping of user credentials.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn user_exists_by_email(&self, email: &str) -> Result<bool, AppError>;
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;
    async fn mark_user_verified(&self, user_id: Uuid) -> Result<(), AppError>;
}

/// Durable mapping from (organization, user) to membership.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    async fn find_member_by_id(&self, member_id: Uuid) -> Result<Option<Member>, AppError>;
    async fn insert_member(&self, member: &Member) -> Result<(), AppError>;
}

/// Durable sets of roles and actions plus their many-to-many assignment.
#[async_trait]
pub trait RoleActionCatalog: Send + Sync {
    async fn find_action_by_name(&self, name: &str) -> Result<Option<Action>, AppError>;
    async fn role_has_action(&self, role_id: Uuid, action_id: Uuid) -> Result<bool, AppError>;
    async fn insert_role(&self, role: &Role) -> Result<(), AppError>;
    async fn insert_action(&self, action: &Action) -> Result<(), AppError>;
    /// Idempotent: granting an already-granted pair is a no-op.
    async fn grant_action_to_role(&self, role_id: Uuid, action_id: Uuid) -> Result<(), AppError>;
    async fn revoke_action_from_role(&self, role_id: Uuid, action_id: Uuid)
        -> Result<(), AppError>;
}

/// Durable store of single-use verification codes.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    async fn insert_code(&self, code: &VerificationCode) -> Result<(), AppError>;

    /// Atomically mark the matching unused, unexpired code as used.
    ///
    /// This is the one conditional write the whole consumption path hangs
    /// on: implementations must flip `is_used` and report whether the write
    /// applied in a single storage-level operation, so that two racing
    /// callers can never both observe success. `now` is a Unix timestamp in
    /// seconds.
    async fn consume_code(
        &self,
        user_email: &str,
        code_text: &str,
        now: i64,
    ) -> Result<bool, AppError>;

    /// Unconditionally mark a code as used by id. Returns whether the code
    /// exists.
    async fn mark_code_used(&self, code_id: Uuid) -> Result<bool, AppError>;

    /// Delete every code past its expiry, used or not. Returns the number
    /// of rows removed.
    async fn delete_expired_codes(&self, now: i64) -> Result<u64, AppError>;
}

/// In-process store backed by mutex-guarded collections.
///
/// `consume_code` performs its check-and-flip under a single lock
/// acquisition, so the single-use guarantee holds under concurrent access
/// exactly as it does for the SQL conditional update.
#[derive(Default)]
pub struct MemoryStore {
    users: std::sync::Mutex<Vec<User>>,
    members: std::sync::Mutex<Vec<Member>>,
    roles: std::sync::Mutex<Vec<Role>>,
    actions: std::sync::Mutex<Vec<Action>>,
    role_actions: std::sync::Mutex<std::collections::HashSet<(Uuid, Uuid)>>,
    codes: std::sync::Mutex<Vec<VerificationCode>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> AppError {
    AppError::InternalError(anyhow::anyhow!("Memory store mutex poisoned: {}", e))
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users.iter().any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.lock().map_err(poisoned)?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Email already registered"
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn mark_user_verified(&self, user_id: Uuid) -> Result<(), AppError> {
        let mut users = self.users.lock().map_err(poisoned)?;
        if let Some(user) = users.iter_mut().find(|u| u.user_id == user_id) {
            user.verified = true;
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipDirectory for MemoryStore {
    async fn find_member_by_id(&self, member_id: Uuid) -> Result<Option<Member>, AppError> {
        let members = self.members.lock().map_err(poisoned)?;
        Ok(members.iter().find(|m| m.member_id == member_id).cloned())
    }

    async fn insert_member(&self, member: &Member) -> Result<(), AppError> {
        let mut members = self.members.lock().map_err(poisoned)?;
        if members.iter().any(|m| {
            m.organization_id == member.organization_id && m.user_id == member.user_id
        }) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "User already a member of organization"
            )));
        }
        members.push(member.clone());
        Ok(())
    }
}

#[async_trait]
impl RoleActionCatalog for MemoryStore {
    async fn find_action_by_name(&self, name: &str) -> Result<Option<Action>, AppError> {
        let actions = self.actions.lock().map_err(poisoned)?;
        Ok(actions.iter().find(|a| a.action_name == name).cloned())
    }

    async fn role_has_action(&self, role_id: Uuid, action_id: Uuid) -> Result<bool, AppError> {
        let role_actions = self.role_actions.lock().map_err(poisoned)?;
        Ok(role_actions.contains(&(role_id, action_id)))
    }

    async fn insert_role(&self, role: &Role) -> Result<(), AppError> {
        let mut roles = self.roles.lock().map_err(poisoned)?;
        roles.push(role.clone());
        Ok(())
    }

    async fn insert_action(&self, action: &Action) -> Result<(), AppError> {
        let mut actions = self.actions.lock().map_err(poisoned)?;
        actions.push(action.clone());
        Ok(())
    }

    async fn grant_action_to_role(&self, role_id: Uuid, action_id: Uuid) -> Result<(), AppError> {
        let mut role_actions = self.role_actions.lock().map_err(poisoned)?;
        role_actions.insert((role_id, action_id));
        Ok(())
    }

    async fn revoke_action_from_role(
        &self,
        role_id: Uuid,
        action_id: Uuid,
    ) -> Result<(), AppError> {
        let mut role_actions = self.role_actions.lock().map_err(poisoned)?;
        role_actions.remove(&(role_id, action_id));
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeStore for MemoryStore {
    async fn insert_code(&self, code: &VerificationCode) -> Result<(), AppError> {
        let mut codes = self.codes.lock().map_err(poisoned)?;
        codes.push(code.clone());
        Ok(())
    }

    async fn consume_code(
        &self,
        user_email: &str,
        code_text: &str,
        now: i64,
    ) -> Result<bool, AppError> {
        let mut codes = self.codes.lock().map_err(poisoned)?;
        match codes.iter_mut().find(|c| {
            c.user_email.eq_ignore_ascii_case(user_email)
                && c.code_text == code_text
                && c.is_consumable(now)
        }) {
            Some(code) => {
                code.is_used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_code_used(&self, code_id: Uuid) -> Result<bool, AppError> {
        let mut codes = self.codes.lock().map_err(poisoned)?;
        match codes.iter_mut().find(|c| c.code_id == code_id) {
            Some(code) => {
                code.is_used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired_codes(&self, now: i64) -> Result<u64, AppError> {
        let mut codes = self.codes.lock().map_err(poisoned)?;
        let before = codes.len();
        codes.retain(|c| !c.is_expired(now));
        Ok((before - codes.len()) as u64)
    }
}
