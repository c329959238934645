//! Services layer for the authorization and verification core.
//!
//! Provides permission resolution, the verification code lifecycle, and the
//! account flows built on top of them.

mod account;
mod database;
pub mod error;
mod permission;
mod store;
mod verification;

pub use account::AccountService;
pub use database::Database;
pub use error::ServiceError;
pub use permission::PermissionService;
pub use store::{
    IdentityStore, MembershipDirectory, MemoryStore, RoleActionCatalog, VerificationCodeStore,
};
pub use verification::{
    CodeGenerator, MockCodeGenerator, SecureCodeGenerator, VerificationCodeService, CODE_LENGTH,
};
