//! Action model - named permission keys callers use to express intent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Action entity. `action_name` (e.g. `expense_delete`) is the lookup key;
/// callers never deal in action IDs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Action {
    pub action_id: Uuid,
    pub action_name: String,
    pub description: Option<String>,
    pub created_utc: DateTime<Utc>,
}

impl Action {
    /// Create a new action.
    pub fn new(action_name: String, description: Option<String>) -> Self {
        Self {
            action_id: Uuid::new_v4(),
            action_name,
            description,
            created_utc: Utc::now(),
        }
    }
}
