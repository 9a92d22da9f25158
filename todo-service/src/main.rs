use service_core::observability::init_tracing;
use todo_service::config::TodoConfig;
use todo_service::services::init_metrics;
use todo_service::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = TodoConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "todo-service",
        &config.common.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    application.run_until_stopped().await
}
