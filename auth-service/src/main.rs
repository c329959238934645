use auth_service::{
    config::AuthConfig,
    db,
    services::{Database, SecureCodeGenerator, VerificationCodeService},
};
use service_core::observability::logging::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AuthConfig::from_env()?;

    init_tracing(&config.service_name, &config.common.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting auth maintenance worker"
    );

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database initialized successfully");

    let database = Database::new(pool);
    let codes = VerificationCodeService::new(
        Arc::new(database),
        Arc::new(SecureCodeGenerator),
        config.verification.code_ttl_seconds,
    );

    let period = Duration::from_secs(config.verification.cleanup_interval_seconds);
    tracing::info!(
        period_seconds = config.verification.cleanup_interval_seconds,
        "Running expired verification code sweep"
    );

    tokio::select! {
        _ = codes.run_cleanup(period) => {}
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping sweep");
        }
    }

    Ok(())
}
