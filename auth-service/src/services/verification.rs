//! Verification code issuance and consumption.

use rand::rngs::OsRng;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::models::VerificationCode;
use crate::services::store::VerificationCodeStore;
use crate::services::ServiceError;
use crate::utils::validation::is_valid_email;

/// Symbols code text is drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed length of generated codes.
pub const CODE_LENGTH: usize = 6;

/// Source of verification code text.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws codes uniformly from the alphanumeric alphabet using the
/// operating system CSPRNG. Code unpredictability is a security property
/// of the verification step, not a cosmetic one.
#[derive(Debug, Default, Clone)]
pub struct SecureCodeGenerator;

impl CodeGenerator for SecureCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = OsRng;
        (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

/// Deterministic generator for tests: yields the queued codes in order,
/// then keeps returning the fallback.
pub struct MockCodeGenerator {
    queue: std::sync::Mutex<std::collections::VecDeque<String>>,
    fallback: String,
}

impl MockCodeGenerator {
    pub fn new(code: &str) -> Self {
        Self {
            queue: std::sync::Mutex::new(std::collections::VecDeque::new()),
            fallback: code.to_string(),
        }
    }

    pub fn with_sequence(codes: &[&str]) -> Self {
        Self {
            queue: std::sync::Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            fallback: codes.last().map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

impl CodeGenerator for MockCodeGenerator {
    fn generate(&self) -> String {
        self.queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Lifecycle manager for single-use, time-bounded verification codes.
///
/// A code is ACTIVE until either a successful `verify` consumes it or its
/// expiry passes; both end states are terminal. Issuing a new code never
/// invalidates outstanding ones - several ACTIVE codes may coexist for one
/// email, and `verify` matches the exact `(user_email, code_text)` pair.
#[derive(Clone)]
pub struct VerificationCodeService {
    store: Arc<dyn VerificationCodeStore>,
    generator: Arc<dyn CodeGenerator>,
    ttl_seconds: i64,
}

impl VerificationCodeService {
    pub fn new(
        store: Arc<dyn VerificationCodeStore>,
        generator: Arc<dyn CodeGenerator>,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            store,
            generator,
            ttl_seconds,
        }
    }

    /// Generate and persist a new code for `user_email`.
    ///
    /// The full code is returned for out-of-band delivery by the caller;
    /// it is never logged here.
    pub async fn issue(&self, user_email: &str) -> Result<VerificationCode, ServiceError> {
        if !is_valid_email(user_email) {
            return Err(ServiceError::InvalidEmail(user_email.to_string()));
        }

        let code = VerificationCode::new(
            user_email.to_string(),
            self.generator.generate(),
            self.ttl_seconds,
        );
        self.store.insert_code(&code).await?;

        tracing::info!(code_id = %code.code_id, email = %code.user_email, "Verification code issued");
        Ok(code)
    }

    /// Attempt to consume the matching unused, unexpired code.
    ///
    /// A nonexistent pair, an already-consumed code, an expired code, and a
    /// lost race against a concurrent caller all come back as `Ok(false)` -
    /// one collapsed outcome, so the result cannot be used as an oracle for
    /// which of them happened. `Err` is reserved for storage failures;
    /// whether to retry is the caller's call.
    pub async fn verify(&self, user_email: &str, code_text: &str) -> Result<bool, ServiceError> {
        let now = chrono::Utc::now().timestamp();
        let consumed = self.store.consume_code(user_email, code_text, now).await?;

        if consumed {
            tracing::info!(email = %user_email, "Verification code consumed");
        } else {
            tracing::debug!(email = %user_email, "Verification attempt failed");
        }
        Ok(consumed)
    }

    /// Administratively mark a code used without consuming it, e.g. when a
    /// newer code supersedes it. Idempotent for already-used codes; an
    /// unknown id is a caller bug.
    pub async fn invalidate(&self, code_id: Uuid) -> Result<(), ServiceError> {
        if self.store.mark_code_used(code_id).await? {
            tracing::info!(%code_id, "Verification code invalidated");
            Ok(())
        } else {
            Err(ServiceError::CodeNotFound(code_id))
        }
    }

    /// Delete every code past its expiry, consumed or not.
    pub async fn cleanup_expired(&self) -> Result<u64, ServiceError> {
        let now = chrono::Utc::now().timestamp();
        let removed = self.store.delete_expired_codes(now).await?;
        if removed > 0 {
            tracing::info!(removed, "Cleaned up expired verification codes");
        }
        Ok(removed)
    }

    /// Run the expired-code sweep on a fixed period until the future is
    /// dropped. Safe to run alongside `verify`: consumption is a single
    /// conditional write, and both paths agree an expired row is unusable.
    pub async fn run_cleanup(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = self.cleanup_expired().await {
                tracing::error!(error = %e, "Expired code sweep failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        let generator = SecureCodeGenerator;
        let code = generator.generate();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn test_generated_codes_vary() {
        let generator = SecureCodeGenerator;
        // 36^6 possibilities; two identical draws in a row mean a broken source.
        assert_ne!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_mock_generator_sequence() {
        let generator = MockCodeGenerator::with_sequence(&["AAAAAA", "BBBBBB"]);
        assert_eq!(generator.generate(), "AAAAAA");
        assert_eq!(generator.generate(), "BBBBBB");
        assert_eq!(generator.generate(), "BBBBBB");
    }
}
