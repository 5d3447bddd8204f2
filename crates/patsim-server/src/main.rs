use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use patsim_server::config::{LogFormat, ServerConfig};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = ServerConfig::from_env()?;
    init_tracing(config.log_format);

    let catalog = patsim_server::load_catalog(&config)?;
    let gateway = patsim_server::build_gateway(&config).await;
    info!(
        backend = gateway.backend(),
        model = %config.model,
        cases = catalog.len(),
        timeout_secs = config.request_timeout.as_secs(),
        "patient simulator configured"
    );

    let state = patsim_server::build_state(&config, catalog, gateway);
    patsim_server::spawn_session_sweeper(state.sessions.clone(), config.session_idle_ttl);
    let app = patsim_server::router(state);

    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
