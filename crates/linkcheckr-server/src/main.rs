use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use linkcheckr_server::config::ServerConfig;
use linkcheckr_server::routes;
use linkcheckr_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("linkcheckr=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config).await?);
    tracing::info!(renderer = %state.renderer, "Link checker ready");

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(routes::cors_layer(&config.cors_origins)?);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
