//! Authorization and email-verification core for the shared-finance
//! ledger platform.
//!
//! Two services carry the real design weight here: the
//! [`services::PermissionService`] resolves "can member M perform action A
//! in organization O" through the member → role → role-action → action
//! chain, and the [`services::VerificationCodeService`] owns the lifecycle
//! of short-lived, single-use email verification codes. Everything else
//! (HTTP surface, financial records, gamification) lives in other services
//! and consumes these through plain call/return.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

pub use services::{
    AccountService, Database, MemoryStore, PermissionService, VerificationCodeService,
};
