use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rest_easy::auth::StaticKeyAuthorizer;
use rest_easy::server::{app, AppState};

#[derive(Parser)]
#[command(name = "rest-easy")]
#[command(about = "Permission-gated, self-describing REST API server")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Port to listen on (overrides REST_EASY_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Address to bind (overrides REST_EASY_BIND)")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECURITY_CLIENT_KEYS etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = rest_easy::config::config().clone();
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    tracing::info!("Starting rest-easy in {:?} mode", config.environment);
    if config.security.client_keys.is_empty() {
        tracing::warn!("No client keys configured; every gated request will be unauthorized");
    }

    let bind_addr = format!("{}:{}", config.server.bind, config.server.port);
    let authorizer = Arc::new(StaticKeyAuthorizer::new(config.security.client_keys.clone()));
    let state = AppState::new(config, authorizer)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("rest-easy listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
