use std::sync::Arc;

use crate::config::Config;
use crate::index::embeddings::OpenAiEmbedder;
use crate::llm_client::LlmClient;
use crate::screening::evidence_scorer::SkillScorer;
use crate::screening::session::SessionStore;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<LlmClient>,
    pub embedder: Arc<OpenAiEmbedder>,
    /// Pluggable per-skill scorer. Production: RagSkillScorer over the
    /// completion + embedding collaborators.
    pub scorer: Arc<dyn SkillScorer>,
    /// In-memory screening sessions, one per analysis run.
    pub sessions: SessionStore,
    pub config: Config,
}
