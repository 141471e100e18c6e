use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use pagepulse_core::{config::Config, site::SiteMap};
use pagepulse_server::{app::build_app, ga::GaDataClient, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Structured JSON logging. Level controlled via the RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagepulse_server=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Load and validate the service-account credential up front; a bad key
    // file stops the process here instead of failing the first request.
    let reporter = GaDataClient::from_key_file(&cfg.credentials_path)?;
    let sites = SiteMap::from_config(&cfg);

    let state = Arc::new(AppState::new(Arc::new(reporter), sites));
    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = build_app(Arc::clone(&state));

    info!(port = cfg.port, "Analytics proxy listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
