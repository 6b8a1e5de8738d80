use std::sync::Arc;

use sqlx::PgPool;

use crate::localization::resume_translator::ResumeTranslator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Built once in `main` around the shared LLM client and detector.
    pub translator: Arc<ResumeTranslator>,
}
