use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    Storage(#[from] AppError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("User not found")]
    UserNotFound,

    #[error("Verification code not found: {0}")]
    CodeNotFound(Uuid),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(e) => e,
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidEmail(e) => {
                AppError::BadRequest(anyhow::anyhow!("Invalid email address: {}", e))
            }
            ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(anyhow::anyhow!("Email already registered"))
            }
            ServiceError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::EmailNotVerified => {
                AppError::Forbidden(anyhow::anyhow!("Email not verified"))
            }
            ServiceError::UserNotFound => AppError::NotFound(anyhow::anyhow!("User not found")),
            ServiceError::CodeNotFound(id) => {
                AppError::NotFound(anyhow::anyhow!("Verification code not found: {}", id))
            }
        }
    }
}
