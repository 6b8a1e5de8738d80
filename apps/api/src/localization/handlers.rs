//! Axum route handlers for the Localization API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::localization::detect::{identify, LanguageGuess, UNDETERMINED};
use crate::localization::language::{LanguageCode, LanguageProfile};
use crate::localization::normalize::normalize_language_code;
use crate::localization::resume_translator::TranslationOutcome;
use crate::models::resume::ResumeContent;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<&'static LanguageProfile>,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    /// Raw best guess, or `"und"`.
    pub code: String,
    /// Supported code the guess maps to; `None` when undetermined.
    pub normalized: Option<LanguageCode>,
    pub guesses: Vec<LanguageGuess>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub resume: ResumeContent,
    pub target_language: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/languages
pub async fn handle_list_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: LanguageCode::ALL.into_iter().map(LanguageCode::profile).collect(),
    })
}

/// POST /api/v1/languages/detect
///
/// Identifies the language of a text sample. Short or unrecognisable text is
/// reported as `"und"`, never as an error.
pub async fn handle_detect(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Json<DetectResponse> {
    let identification = identify(state.translator.detector(), &request.text);

    let response = if identification.is_determined() {
        DetectResponse {
            code: identification.code().to_string(),
            normalized: Some(normalize_language_code(Some(identification.code()))),
            guesses: identification.guesses().to_vec(),
        }
    } else {
        DetectResponse {
            code: UNDETERMINED.to_string(),
            normalized: None,
            guesses: Vec::new(),
        }
    };

    Json(response)
}

/// POST /api/v1/translate
///
/// Translates an inline resume. Field-level failures degrade to the original text,
/// so any valid payload gets a complete resume back.
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslationOutcome>, AppError> {
    require_target(&request.target_language)?;
    request.resume.validate()?;

    let outcome = state
        .translator
        .translate(request.resume, &request.target_language)
        .await;

    Ok(Json(outcome))
}

pub(crate) fn require_target(target_language: &str) -> Result<(), AppError> {
    if target_language.trim().is_empty() {
        return Err(AppError::Validation(
            "targetLanguage cannot be empty".to_string(),
        ));
    }
    Ok(())
}
