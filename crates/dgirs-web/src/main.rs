//! dgirs web dashboard
//!
//! Run with: cargo run -p dgirs-web

use dgirs_common::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dgirs=debug,info")),
        )
        .init();

    info!("🧬 dgirs dashboard starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("Configuration loaded. DGIdb endpoint: {}", config.api.url);

    let state = dgirs_web::state::AppState::from_config(&config).await?;
    info!(
        "Name lists ready: {} genes, {} drugs",
        state.genes.snapshot().await.len(),
        state.drugs.snapshot().await.len()
    );

    let app = dgirs_web::router::build_router(state);

    let bind_addr = format!("{}:{}", config.web.host, config.web.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("🚀 Dashboard listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
