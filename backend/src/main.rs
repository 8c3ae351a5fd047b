//! AgriVerse ML API - Backend Server
//!
//! Predicts crop yield and revenue per hectare and recommends the next crop
//! for a state's upcoming season.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agriverse_backend::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agriverse_server=debug,agriverse_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting AgriVerse ML API");
    tracing::info!("Environment: {}", config.environment);

    // Load model and weather artifacts
    let state = AppState::load(config.clone())?;
    tracing::info!(
        "Artifacts ready (revenue model: {}, weather averages: {})",
        state.revenue_model.is_available(),
        state.weather.is_available()
    );

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
