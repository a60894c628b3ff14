use std::net::SocketAddr;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ats_api::ats::{AtsEngine, Vocabulary};
use ats_api::config::Config;
use ats_api::routes::build_router;
use ats_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Compile vocabulary (built-in, optionally extended from a JSON file)
    let vocabulary = match &config.vocabulary_path {
        Some(path) => Vocabulary::from_json_file(path)
            .with_context(|| format!("Failed to load vocabulary from {}", path.display()))?,
        None => Vocabulary::default(),
    };
    info!(
        "Vocabulary ready: {} skill patterns",
        vocabulary.skill_patterns().len()
    );

    let state = AppState::new(config.clone(), AtsEngine::new(vocabulary));

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
