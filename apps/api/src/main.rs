mod config;
mod errors;
mod extract;
mod index;
mod llm_client;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::index::embeddings::OpenAiEmbedder;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::evidence_scorer::RagSkillScorer;
use crate::screening::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screening API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(
        config.openai_api_key.clone(),
        config.base_url.clone(),
        config.model_name.clone(),
    ));
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize embedding client
    let embedder = Arc::new(OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        config.base_url.clone(),
        config.embedding_model.clone(),
    ));
    info!("Embedding client initialized (model: {})", config.embedding_model);

    // Initialize the per-skill scorer over the two collaborators
    let scorer = Arc::new(RagSkillScorer::new(llm.clone(), embedder.clone()));

    // Build app state
    let state = AppState {
        llm,
        embedder,
        scorer,
        sessions: SessionStore::new(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
