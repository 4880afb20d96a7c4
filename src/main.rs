//! HTTP server for the delivery pricing engine.
//!
//! Reads the pricing configuration from `PRICING_CONFIG_DIR` (default
//! `./config/pricing`) and listens on `PRICING_BIND_ADDR` (default
//! `0.0.0.0:8080`).

use anyhow::Context;
use delivery_pricing::api::{AppState, create_router};
use delivery_pricing::config::ConfigLoader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("PRICING_CONFIG_DIR").unwrap_or_else(|_| "./config/pricing".into());
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading pricing configuration from {config_dir}"))?;
    tracing::info!(
        config_dir = %config_dir,
        couriers = config.config().couriers().len(),
        rules = config.config().rules().len(),
        "Pricing configuration loaded"
    );

    let app = create_router(AppState::new(config));

    let addr = std::env::var("PRICING_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
