//! Language identification over free-text resume fields.
//!
//! `identify` never fails: short input, detector errors and empty results all
//! collapse to `Identification::Undetermined`.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use whatlang::{Detector, Lang};

use crate::localization::language::LanguageCode;

/// Code reported when no language could be identified.
pub const UNDETERMINED: &str = "und";

/// Inputs with fewer non-whitespace characters than this are not sampled.
const MIN_SAMPLE_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum DetectError {
    #[cfg_attr(not(test), allow(dead_code))] // no bundled backend fails yet
    #[error("detector backend failed: {0}")]
    Backend(String),
}

/// One candidate language with the detector's confidence (0.0 – 1.0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageGuess {
    pub code: String,
    pub confidence: f64,
}

/// A statistical language detector. Returns zero or more guesses for `text`.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Result<Vec<LanguageGuess>, DetectError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Identification {
    /// `guesses` is ordered by descending confidence; `code` is the first one.
    Detected {
        code: String,
        guesses: Vec<LanguageGuess>,
    },
    Undetermined,
}

impl Identification {
    pub fn code(&self) -> &str {
        match self {
            Identification::Detected { code, .. } => code,
            Identification::Undetermined => UNDETERMINED,
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, Identification::Detected { .. })
    }

    pub fn guesses(&self) -> &[LanguageGuess] {
        match self {
            Identification::Detected { guesses, .. } => guesses,
            Identification::Undetermined => &[],
        }
    }
}

/// Runs `detector` over `text`, swallowing every failure mode.
pub fn identify(detector: &dyn LanguageDetector, text: &str) -> Identification {
    let sample_len = text.chars().filter(|c| !c.is_whitespace()).count();
    if sample_len < MIN_SAMPLE_CHARS {
        return Identification::Undetermined;
    }

    let mut guesses = match detector.detect(text) {
        Ok(guesses) => guesses,
        Err(e) => {
            debug!("Language detection failed, treating as undetermined: {e}");
            return Identification::Undetermined;
        }
    };

    guesses.retain(|g| !g.code.is_empty() && g.code != UNDETERMINED);
    guesses.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    match guesses.first() {
        Some(best) => Identification::Detected {
            code: best.code.clone(),
            guesses,
        },
        None => Identification::Undetermined,
    }
}

/// Trigram detector restricted to the supported languages.
pub struct WhatlangDetector {
    detector: Detector,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        let allowlist = LanguageCode::ALL.into_iter().map(to_whatlang).collect();
        Self {
            detector: Detector::with_allowlist(allowlist),
        }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<Vec<LanguageGuess>, DetectError> {
        Ok(self
            .detector
            .detect(text)
            .and_then(|info| {
                from_whatlang(info.lang()).map(|code| LanguageGuess {
                    code: code.as_str().to_string(),
                    confidence: info.confidence(),
                })
            })
            .into_iter()
            .collect())
    }
}

fn to_whatlang(code: LanguageCode) -> Lang {
    match code {
        LanguageCode::En => Lang::Eng,
        LanguageCode::Fr => Lang::Fra,
        LanguageCode::Es => Lang::Spa,
        LanguageCode::De => Lang::Deu,
        LanguageCode::It => Lang::Ita,
        LanguageCode::Pt => Lang::Por,
    }
}

fn from_whatlang(lang: Lang) -> Option<LanguageCode> {
    match lang {
        Lang::Eng => Some(LanguageCode::En),
        Lang::Fra => Some(LanguageCode::Fr),
        Lang::Spa => Some(LanguageCode::Es),
        Lang::Deu => Some(LanguageCode::De),
        Lang::Ita => Some(LanguageCode::It),
        Lang::Por => Some(LanguageCode::Pt),
        _ => None,
    }
}
