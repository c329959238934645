//! User model - platform-wide identity with credential hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity. `email` is unique platform-wide (case-insensitive).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub created_utc: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            verified: false,
            created_utc: Utc::now(),
        }
    }
}

/// User representation safe to hand to callers - no credential hash.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub verified: bool,
    pub created_utc: DateTime<Utc>,
}

impl From<User> for SanitizedUser {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            email: u.email,
            verified: u.verified,
            created_utc: u.created_utc,
        }
    }
}
