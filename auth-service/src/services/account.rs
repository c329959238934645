//! Account lifecycle: registration, email confirmation, login.

use std::sync::Arc;

use crate::models::{User, VerificationCode};
use crate::services::store::IdentityStore;
use crate::services::{ServiceError, VerificationCodeService};
use crate::utils::password::{CredentialHasher, Password, PasswordHashString};
use crate::utils::validation::is_valid_email;

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn IdentityStore>,
    codes: VerificationCodeService,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn IdentityStore>,
        codes: VerificationCodeService,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            users,
            codes,
            hasher,
        }
    }

    /// Register a new user and issue their first verification code.
    ///
    /// The returned code is for out-of-band delivery to the user; this
    /// service never transmits it anywhere itself.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, VerificationCode), ServiceError> {
        if !is_valid_email(email) {
            return Err(ServiceError::InvalidEmail(email.to_string()));
        }

        if self.users.user_exists_by_email(email).await? {
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        let password_hash = self
            .hasher
            .hash(&Password::new(password.to_string()))
            .map_err(|e| anyhow::anyhow!("Credential hashing error: {}", e))?;

        let user = User::new(
            name.to_string(),
            email.to_string(),
            password_hash.into_string(),
        );
        self.users.insert_user(&user).await?;

        tracing::info!(user_id = %user.user_id, "User registered");

        let code = self.codes.issue(email).await?;
        Ok((user, code))
    }

    /// Consume a verification code and flip the user's verified flag.
    ///
    /// Returns `Ok(false)` when the code does not consume (wrong, used, or
    /// expired) - the flag is untouched in that case. The false→true
    /// transition happens at most once.
    pub async fn confirm_email(&self, email: &str, code_text: &str) -> Result<bool, ServiceError> {
        if !self.codes.verify(email, code_text).await? {
            return Ok(false);
        }

        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        if !user.verified {
            self.users.mark_user_verified(user.user_id).await?;
            tracing::info!(user_id = %user.user_id, "Email verified for user");
        }
        Ok(true)
    }

    /// Authenticate with email and password.
    ///
    /// A missing account and a wrong password collapse to the same
    /// `InvalidCredentials` so a failed login does not reveal whether the
    /// email is registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let matches = self.hasher.verify(
            &Password::new(password.to_string()),
            &PasswordHashString::new(user.password_hash.clone()),
        );
        if !matches {
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.verified {
            return Err(ServiceError::EmailNotVerified);
        }

        tracing::info!(user_id = %user.user_id, "User logged in");
        Ok(user)
    }
}
