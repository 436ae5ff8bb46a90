use std::path::PathBuf;
use std::sync::Arc;

use crate::chat::assistant::Assistant;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub config: Config,
    /// Résumé locations tried at startup, reported by the debug endpoint.
    pub resume_candidates: Arc<Vec<PathBuf>>,
}
