use service_core::observability::init_tracing;
use student_service::config::StudentConfig;
use student_service::services::init_metrics;
use student_service::Application;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics();

    let config = StudentConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "student-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.store.backend,
        database = %config.mongodb.database,
        "Starting student service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start student service: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("HTTP server error: {}", e);
        e
    })
}
