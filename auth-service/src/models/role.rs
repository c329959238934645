//! Role model - named permission bundles with action mappings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role entity. `role_name` is unique across the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub role_id: Uuid,
    pub role_name: String,
    pub description: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Role {
    /// Create a new role.
    pub fn new(role_name: String, description: Option<String>) -> Self {
        Self {
            role_id: Uuid::new_v4(),
            role_name,
            description,
            created_utc: Utc::now(),
        }
    }
}

/// Role-action mapping. A given pair appears at most once.
#[derive(Debug, Clone, FromRow)]
pub struct RoleAction {
    pub role_id: Uuid,
    pub action_id: Uuid,
}
