use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use papersite_core::config_file::{apply_env_overrides, load_config};
use papersite_ingest::{Ingestor, UploadLimits};
use papersite_parsing::{ExtractorConfig, StructureExtractor};

mod handlers;
mod models;
mod state;
mod upload;

use state::{AppState, ServerSettings};

/// Room above the upload limit for multipart framing, so a file just over the
/// limit still reaches the validator and gets its message.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

pub(crate) fn app(state: Arc<AppState>) -> Router {
    let max_file_size = usize::try_from(state.ingestor.limits().max_file_size).unwrap_or(usize::MAX);
    let body_limit = DefaultBodyLimit::max(max_file_size.saturating_add(BODY_LIMIT_SLACK));

    Router::new()
        .route("/api/upload", post(handlers::upload::upload))
        .route("/health", get(handlers::health::health))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = apply_env_overrides(load_config());
    let settings = ServerSettings::from_config(&config)?;

    let extractor_config = match &config.extraction {
        Some(extraction) => ExtractorConfig::from_file_config(extraction)
            .context("invalid [extraction] configuration")?,
        None => ExtractorConfig::default(),
    };
    let limits = config
        .limits
        .as_ref()
        .map(UploadLimits::from_file_config)
        .unwrap_or_default();

    let ingestor = Ingestor::new()
        .with_extractor(StructureExtractor::with_config(extractor_config))
        .with_limits(limits);

    let state = Arc::new(AppState::new(
        ingestor,
        settings.max_concurrent_decodes,
        settings.decode_timeout,
    ));

    let listener = tokio::net::TcpListener::bind(settings.addr)
        .await
        .with_context(|| format!("cannot bind {}", settings.addr))?;
    tracing::info!(
        addr = %settings.addr,
        max_file_mb = limits.max_megabytes(),
        max_concurrent_decodes = settings.max_concurrent_decodes,
        "listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
