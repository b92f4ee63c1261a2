mod catalog;
mod chat;
mod config;
mod errors;
mod models;
mod onboarding;
mod profile;
mod recommender;
mod routes;
mod state;
mod tracker;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::catalog::RoleCatalog;
use crate::config::Config;
use crate::onboarding::FileOnboardingStore;
use crate::recommender::{RecommendationClient, Recommender};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Voca v{}", env!("CARGO_PKG_VERSION"));

    let catalog = Arc::new(RoleCatalog::embedded()?);
    info!("Role catalog loaded ({} roles)", catalog.len());

    let client = RecommendationClient::new(
        &config.recommender_base_url,
        config.recommender_timeout,
        catalog.clone(),
    )?;
    info!(
        "Recommendation client initialized (base url: {}, timeout: {:?})",
        client.base_url(),
        config.recommender_timeout
    );

    let onboarding = FileOnboardingStore::new(config.onboarding_state_path.clone());
    info!("Onboarding flag stored at {:?}", onboarding.path());

    let state = AppState::new(
        config.clone(),
        Arc::new(client),
        catalog,
        Arc::new(onboarding),
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
