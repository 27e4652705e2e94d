use role_service::{
    config::RoleConfig,
    services::{init_metrics, InMemoryRoleStore, RoleUseCases},
    startup::Application,
};
use service_core::error::AppError;
use service_core::observability::init_tracing;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = RoleConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting role service"
    );

    let store = Arc::new(InMemoryRoleStore::new());
    let use_cases = RoleUseCases::from_backend(store);
    tracing::info!("In-memory role store initialized");

    let app = Application::build(config, use_cases).await?;
    app.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
