mod chat;
mod config;
mod errors;
mod llm_client;
mod resume;
mod retrieval;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::chat::assistant::Assistant;
use crate::config::Config;
use crate::llm_client::{Completer, Embedder, LlmClient};
use crate::resume::loader::{candidate_paths, load_document};
use crate::resume::normalize::normalize;
use crate::retrieval::Retriever;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting résumé chat API v{}", env!("CARGO_PKG_VERSION"));

    // Load and normalize the résumé (fail-open: an unreadable file means an empty profile)
    let cwd = std::env::current_dir().context("Cannot resolve working directory")?;
    let candidates = candidate_paths(config.resume_path.as_deref(), &cwd);
    let raw = load_document(&candidates, config.debug);
    let resume = normalize(&raw);
    info!(
        "Résumé loaded: name={:?}, {} skills, {} roles, {} projects",
        resume.name,
        resume.skills.len(),
        resume.experience.len(),
        resume.projects.len()
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_settings()).context("Failed to build HTTP client")?;
    info!(
        "LLM client initialized (chat: {}, embeddings: {})",
        config.chat_model, config.embedding_model
    );

    let embedder: Option<Arc<dyn Embedder>> = if config.embeddings_available() {
        Some(Arc::new(llm.clone()))
    } else {
        info!("Embeddings disabled; retrieval uses lexical scoring");
        None
    };

    let completer: Option<Arc<dyn Completer>> = if llm.is_configured() {
        Some(Arc::new(llm))
    } else {
        warn!("OPENAI_API_KEY not set; only shortcut questions can be answered");
        None
    };

    let assistant = Assistant::new(resume, Retriever::new(embedder), completer, config.top_k);

    // Build app state
    let state = AppState {
        assistant: Arc::new(assistant),
        config: config.clone(),
        resume_candidates: Arc::new(candidates),
    };

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
