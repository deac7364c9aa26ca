use agent_relay::app_state::build_app_state;
use agent_relay::build_router;
use agent_relay::config::RelayConfig;

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_relay=info,tower_http=info".into()),
        )
        .init();

    let config = RelayConfig::from_env()?;
    info!(
        ollama_url = %config.ollama_url,
        model = %config.ollama_model,
        app_id = %config.app_id,
        installation_id = config.installation_id,
        "starting agent relay"
    );

    let bind_addr = config.bind_addr;
    let app_state = build_app_state(config)?;
    let app = build_router(Arc::new(app_state));

    let listener = TcpListener::bind(bind_addr).await?;
    info!("listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("signal received, starting graceful shutdown");
}
