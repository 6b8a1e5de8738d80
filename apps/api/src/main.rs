mod config;
mod db;
mod errors;
mod llm_client;
mod localization;
mod models;
mod resumes;
mod routes;
mod state;
mod test_utils;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::localization::detect::WhatlangDetector;
use crate::localization::field_translator::FieldTranslator;
use crate::localization::resume_translator::{ResumeTranslator, TranslatorSettings};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Resume translator: whatlang detection + LLM field translation
    let translator = ResumeTranslator::new(
        Arc::new(WhatlangDetector::new()),
        FieldTranslator::new(Arc::new(llm)).with_backoff(config.translation_retry_backoff),
        TranslatorSettings {
            preserve_terms: config.preserve_terms.clone(),
            concurrency: config.translation_concurrency,
            deadline: config.translation_deadline,
        },
    );
    info!(
        "Translator ready (concurrency: {}, deadline: {}s, {} preserve terms)",
        config.translation_concurrency,
        config.translation_deadline.as_secs(),
        config.preserve_terms.len()
    );

    let state = AppState {
        db: db.clone(),
        translator: Arc::new(translator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
