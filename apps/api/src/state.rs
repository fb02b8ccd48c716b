use std::sync::Arc;

use crate::acquisition::JobDescriptionResolver;
use crate::analysis::analyzer::SkillVocabulary;
use crate::config::Config;
use crate::llm_client::InsightProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resolver: Arc<JobDescriptionResolver>,
    /// Pluggable insight collaborator. Default: the Gemini-backed `LlmClient`.
    pub insight: Arc<dyn InsightProvider>,
    pub vocabulary: Arc<SkillVocabulary>,
}
