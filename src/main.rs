//! Chargepulse - derived quality signals for crowd-reported EV charging stations.
//!
//! # API Endpoints
//!
//! - `POST /stations/stats` - Stats for one station
//! - `POST /stations/stats/batch` - Stats for many stations
//! - `POST /stations/nearby` - Stations within a radius, nearest first
//! - `POST /recommendation` - The single best station
//! - `GET /health` - Health check

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chargepulse::aggregation::StatsAggregator;
use chargepulse::api::{AppState, router};
use chargepulse::config::AppConfig;
use chargepulse::error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs carry ids and counts; comments and user details stay out
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("chargepulse=info".parse()?))
        .try_init()
        .map_err(AppError::logging_init)?;

    let config = AppConfig::from_env()?;

    info!(
        port = config.port,
        nearby_radius_km = config.nearby_radius_km,
        "Starting Chargepulse server"
    );

    let state = AppState {
        aggregator: StatsAggregator::default(),
        config: config.clone(),
    };
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Chargepulse is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
