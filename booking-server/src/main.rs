//! booking-server binary

use booking_server::{AppState, Config, api, logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let log_dir = std::env::var("LOG_DIR").ok();
    logger::init_logger(log_dir.as_deref());

    let config = Config::from_env()?;
    tracing::info!(
        environment = %config.environment,
        storage = ?config.storage,
        timezone = %config.timezone,
        compensate_failed_leads = config.compensate_failed_leads,
        "Starting booking-server"
    );
    if config.is_production() && !config.compensate_failed_leads {
        tracing::warn!("COMPENSATE_FAILED_LEADS is off: a failed lead keeps its reserved place");
    }

    let state = AppState::new(&config).await?;
    let app = api::build_app(state, &config);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("booking-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("booking-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
