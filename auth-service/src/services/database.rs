//! PostgreSQL storage implementation.
//!
//! Implements the storage capabilities over sqlx. Verification code
//! consumption is a single conditional UPDATE judged by its affected row
//! count, so single-use holds across service instances sharing the store.

use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::models::{Action, Member, Role, User, VerificationCode};
use crate::services::store::{
    IdentityStore, MembershipDirectory, RoleActionCatalog, VerificationCodeStore,
};

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for Database {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email, password_hash, verified, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.verified)
        .bind(user.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    async fn mark_user_verified(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET verified = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }
}

#[async_trait]
impl MembershipDirectory for Database {
    async fn find_member_by_id(&self, member_id: Uuid) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE member_id = $1")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn insert_member(&self, member: &Member) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO members (member_id, organization_id, user_id, role_id, created_utc)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(member.member_id)
        .bind(member.organization_id)
        .bind(member.user_id)
        .bind(member.role_id)
        .bind(member.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }
}

#[async_trait]
impl RoleActionCatalog for Database {
    async fn find_action_by_name(&self, name: &str) -> Result<Option<Action>, AppError> {
        sqlx::query_as::<_, Action>("SELECT * FROM actions WHERE action_name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn role_has_action(&self, role_id: Uuid, action_id: Uuid) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM role_actions WHERE role_id = $1 AND action_id = $2)",
        )
        .bind(role_id)
        .bind(action_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    async fn insert_role(&self, role: &Role) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO roles (role_id, role_name, description, created_utc)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(role.role_id)
        .bind(&role.role_name)
        .bind(&role.description)
        .bind(role.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    async fn insert_action(&self, action: &Action) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO actions (action_id, action_name, description, created_utc)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(action.action_id)
        .bind(&action.action_name)
        .bind(&action.description)
        .bind(action.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    async fn grant_action_to_role(&self, role_id: Uuid, action_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO role_actions (role_id, action_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(action_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    async fn revoke_action_from_role(
        &self,
        role_id: Uuid,
        action_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_actions WHERE role_id = $1 AND action_id = $2")
            .bind(role_id)
            .bind(action_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }
}

#[async_trait]
impl VerificationCodeStore for Database {
    async fn insert_code(&self, code: &VerificationCode) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO verification_codes (code_id, user_email, code_text, expire_at, is_used, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(code.code_id)
        .bind(&code.user_email)
        .bind(&code.code_text)
        .bind(code.expire_at)
        .bind(code.is_used)
        .bind(code.created_utc)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    async fn consume_code(
        &self,
        user_email: &str,
        code_text: &str,
        now: i64,
    ) -> Result<bool, AppError> {
        // The whole single-use guarantee rides on this conditional write:
        // of N racing consumers, the row flips once and exactly one caller
        // sees a nonzero affected count.
        let result = sqlx::query(
            r#"
            UPDATE verification_codes
            SET is_used = TRUE
            WHERE LOWER(user_email) = LOWER($1)
              AND code_text = $2
              AND is_used = FALSE
              AND expire_at > $3
            "#,
        )
        .bind(user_email)
        .bind(code_text)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_code_used(&self, code_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE verification_codes SET is_used = TRUE WHERE code_id = $1")
            .bind(code_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_codes(&self, now: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expire_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(result.rows_affected())
    }
}
