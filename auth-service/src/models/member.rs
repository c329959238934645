//! Member model - a user's binding into one organization with one role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Member entity. At most one row per `(organization_id, user_id)` pair;
/// this is the row permission resolution keys off.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub member_id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub created_utc: DateTime<Utc>,
}

impl Member {
    /// Create a new membership binding.
    pub fn new(organization_id: Uuid, user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            member_id: Uuid::new_v4(),
            organization_id,
            user_id,
            role_id,
            created_utc: Utc::now(),
        }
    }

    /// Whether this membership belongs to the given organization.
    pub fn belongs_to(&self, organization_id: Uuid) -> bool {
        self.organization_id == organization_id
    }
}
