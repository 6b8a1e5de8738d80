//! Axum route handlers for stored resumes.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::localization::handlers::require_target;
use crate::localization::language::LanguageCode;
use crate::models::resume::ResumeContent;
use crate::resumes::repository::{load_resume, save_resume_copy, StoredResume};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResumeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume: ResumeContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateStoredRequest {
    pub target_language: String,
    /// Persist the translated copy as a new resume.
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateStoredResponse {
    pub resume: ResumeContent,
    pub source_language: LanguageCode,
    pub target_language: LanguageCode,
    pub translated: bool,
    pub saved_resume_id: Option<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<StoredResumeResponse>, AppError> {
    let stored = find_resume(&state, resume_id).await?;

    Ok(Json(StoredResumeResponse {
        id: stored.id,
        user_id: stored.user_id,
        resume: stored.content,
    }))
}

/// POST /api/v1/resumes/:id/translate
///
/// Translates a stored resume. The stored record is never modified; with `save: true`
/// the translation is written as a new resume owned by the same user.
pub async fn handle_translate_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Json(request): Json<TranslateStoredRequest>,
) -> Result<Json<TranslateStoredResponse>, AppError> {
    require_target(&request.target_language)?;

    let stored = find_resume(&state, resume_id).await?;

    let outcome = state
        .translator
        .translate(stored.content, &request.target_language)
        .await;

    let saved_resume_id = if request.save {
        let id = save_resume_copy(&state.db, stored.user_id, &outcome.resume).await?;
        info!("Stored {} translation of resume {resume_id} as {id}", outcome.target_language);
        Some(id)
    } else {
        None
    };

    Ok(Json(TranslateStoredResponse {
        resume: outcome.resume,
        source_language: outcome.source_language,
        target_language: outcome.target_language,
        translated: outcome.translated,
        saved_resume_id,
    }))
}

async fn find_resume(state: &AppState, resume_id: Uuid) -> Result<StoredResume, AppError> {
    load_resume(&state.db, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}
