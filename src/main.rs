use anyhow::{Context, Result};
use evaluation_coordinator::domain::Database;
use evaluation_coordinator::{
    create_logger, create_router, init_database_with_retry, AppConfig, AppState, Logger,
};
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenvy::dotenv().ok();

    // Resolve everything before any component is constructed.
    let config = AppConfig::from_env()?;

    let logger = create_logger(&config.logging, &config.service);
    logger.install()?;

    let span = logger.span();
    run(config, logger).instrument(span).await
}

async fn run(config: AppConfig, logger: Logger) -> Result<()> {
    // ---
    info!(
        "Starting {} v{} (log level {})",
        config.service.service_name,
        env!("CARGO_PKG_VERSION"),
        logger.level()
    );

    let state = AppState::from_config(&config, logger)?;

    init_database_with_retry(state.database().as_ref(), config.database.retry_count).await?;

    let push_task = state
        .pusher()
        .map(|pusher| pusher.clone().spawn(state.metrics().clone()));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!("Listening on {}", config.server.bind_addr);

    axum::serve(listener, create_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    if let Some(task) = push_task {
        task.abort();
    }

    // Flush the last snapshot; losing it is not worth failing shutdown over.
    if let Some(pusher) = state.pusher() {
        if let Err(err) = pusher.push_once(state.metrics().as_ref()).await {
            tracing::warn!("Final metrics push failed: {err:#}");
        }
    }
    state.database().close().await;

    Ok(())
}

async fn shutdown_signal() {
    // ---
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
