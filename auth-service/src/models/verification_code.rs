//! Verification code model - single-use proof of email ownership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Verification code entity.
///
/// `expire_at` is an absolute Unix timestamp in seconds, so an expiry check
/// is a single comparison against "now". Several codes may be outstanding
/// for the same email at once; consumption matches the exact
/// `(user_email, code_text)` pair, not the most recent code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VerificationCode {
    pub code_id: Uuid,
    pub user_email: String,
    pub code_text: String,
    pub expire_at: i64,
    pub is_used: bool,
    pub created_utc: DateTime<Utc>,
}

impl VerificationCode {
    /// Create a new code expiring `ttl_seconds` from now.
    pub fn new(user_email: String, code_text: String, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            code_id: Uuid::new_v4(),
            user_email,
            code_text,
            expire_at: now.timestamp() + ttl_seconds,
            is_used: false,
            created_utc: now,
        }
    }

    /// Check if the code has expired at the given instant.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expire_at
    }

    /// Check if the code can still be consumed: never used and not expired.
    /// Consumed and expired are both terminal states.
    pub fn is_consumable(&self, now: i64) -> bool {
        !self.is_used && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_code_is_consumable() {
        let code = VerificationCode::new("user@example.com".to_string(), "A1B2C3".to_string(), 3600);
        let now = Utc::now().timestamp();
        assert!(!code.is_used);
        assert!(!code.is_expired(now));
        assert!(code.is_consumable(now));
    }

    #[test]
    fn test_expiry_boundary() {
        let code = VerificationCode::new("user@example.com".to_string(), "A1B2C3".to_string(), 3600);
        // Valid strictly before expire_at, dead at and after it.
        assert!(code.is_consumable(code.expire_at - 1));
        assert!(code.is_expired(code.expire_at));
        assert!(!code.is_consumable(code.expire_at));
        assert!(!code.is_consumable(code.expire_at + 1));
    }

    #[test]
    fn test_used_code_is_not_consumable_even_if_fresh() {
        let mut code =
            VerificationCode::new("user@example.com".to_string(), "A1B2C3".to_string(), 3600);
        code.is_used = true;
        assert!(!code.is_consumable(Utc::now().timestamp()));
    }
}
