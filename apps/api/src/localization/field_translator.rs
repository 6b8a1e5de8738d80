//! Field Translator: translates one piece of text through the `TextGenerator`.
//!
//! Never fails from the caller's point of view: empty input, exhausted retries and
//! lost placeholders all return the original text.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::{PLACEHOLDER_INSTRUCTION, PLAIN_TEXT_ONLY_SYSTEM};
use crate::llm_client::{GenerationOptions, LlmError, TextGenerator};
use crate::localization::language::LanguageCode;
use crate::localization::preserve::mask_terms;
use crate::localization::prompts::{TRANSLATE_PROMPT_TEMPLATE, TRANSLATE_SYSTEM_TEMPLATE};

/// Attempts per field, including the first one.
const MAX_ATTEMPTS: u32 = 2;
const BASE_TEMPERATURE: f32 = 0.2;
const TEMPERATURE_STEP: f32 = 0.2;
const MIN_OUTPUT_TOKENS: u32 = 128;
const MAX_OUTPUT_TOKENS: u32 = 4096;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("translation came back empty")]
    EmptyOutput,

    #[error("translation dropped a protected term placeholder")]
    LostPlaceholder,
}

/// Per-call options.
#[derive(Debug, Clone, Copy)]
pub struct TranslateOptions<'a> {
    /// Terms copied to the output verbatim.
    pub preserve_terms: &'a [String],
    /// Human-readable field name for the prompt, e.g. "job title".
    pub field: &'a str,
}

impl Default for TranslateOptions<'_> {
    fn default() -> Self {
        Self {
            preserve_terms: &[],
            field: "text",
        }
    }
}

#[derive(Clone)]
pub struct FieldTranslator {
    generator: Arc<dyn TextGenerator>,
    max_attempts: u32,
    backoff: Duration,
}

impl FieldTranslator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            max_attempts: MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Base delay before retrying after a rate limit or server error; doubles per attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Translates `text` into `target`, returning `text` unchanged on any failure.
    pub async fn translate(
        &self,
        text: &str,
        target: LanguageCode,
        options: TranslateOptions<'_>,
    ) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        match self.try_translate(text, target, options).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(
                    error = %e,
                    language = %target,
                    field = options.field,
                    "Field translation failed, keeping original text"
                );
                text.to_string()
            }
        }
    }

    /// Same as `translate` but surfaces the failure instead of falling back.
    pub async fn try_translate(
        &self,
        text: &str,
        target: LanguageCode,
        options: TranslateOptions<'_>,
    ) -> Result<String, TranslateError> {
        let masked = mask_terms(text, options.preserve_terms);
        let system = build_system_prompt(target, masked.has_placeholders());
        let prompt = build_prompt(&masked.text, target, options.field);

        let mut last_error = TranslateError::EmptyOutput;

        for attempt in 0..self.max_attempts {
            let generation = options_for_attempt(attempt, text);

            match self.generator.generate(&system, &prompt, generation).await {
                Ok(raw) => {
                    let cleaned = clean_output(&raw);
                    if cleaned.is_empty() {
                        last_error = TranslateError::EmptyOutput;
                    } else if let Some(restored) = masked.restore(cleaned) {
                        debug!(
                            language = %target,
                            field = options.field,
                            attempt = attempt + 1,
                            "Field translated"
                        );
                        return Ok(restored);
                    } else {
                        last_error = TranslateError::LostPlaceholder;
                    }
                }
                Err(e) if !e.is_retryable() => return Err(e.into()),
                Err(e) => {
                    let more_attempts = attempt + 1 < self.max_attempts;
                    if e.is_backpressure() && more_attempts {
                        let delay = self.backoff * 2u32.pow(attempt);
                        warn!(
                            "Translation attempt {} hit backpressure ({e}), retrying after {}ms...",
                            attempt + 1,
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = e.into();
                }
            }
        }

        Err(last_error)
    }
}

fn build_system_prompt(target: LanguageCode, with_placeholders: bool) -> String {
    let profile = target.profile();
    let mut system = TRANSLATE_SYSTEM_TEMPLATE
        .replace("{language_name}", profile.english_name)
        .replace("{native_name}", profile.native_name);
    system.push(' ');
    system.push_str(PLAIN_TEXT_ONLY_SYSTEM);
    if with_placeholders {
        system.push(' ');
        system.push_str(PLACEHOLDER_INSTRUCTION);
    }
    system
}

fn build_prompt(text: &str, target: LanguageCode, field: &str) -> String {
    TRANSLATE_PROMPT_TEMPLATE
        .replace("{field}", field)
        .replace("{language_name}", target.profile().english_name)
        .replace("{text}", text)
}

/// Each retry runs slightly hotter and with a larger output allowance.
fn options_for_attempt(attempt: u32, text: &str) -> GenerationOptions {
    let estimate = (text.chars().count() as u32 / 2).max(MIN_OUTPUT_TOKENS);
    let scaled = (estimate as f32 * 1.5f32.powi(attempt as i32)) as u32;
    GenerationOptions {
        temperature: BASE_TEMPERATURE + TEMPERATURE_STEP * attempt as f32,
        max_tokens: scaled.min(MAX_OUTPUT_TOKENS),
    }
}

/// Strips whitespace plus one layer of code fences or wrapping quotes.
fn clean_output(raw: &str) -> &str {
    let text = raw.trim();
    if let Some(inner) = text.strip_prefix("```") {
        let inner = inner.strip_suffix("```").unwrap_or(inner);
        // Drop an info string such as ```text
        let inner = match inner.split_once('\n') {
            Some((first, rest)) if !first.trim().contains(' ') => rest,
            _ => inner,
        };
        return inner.trim();
    }
    for (open, close) in [('"', '"'), ('“', '”'), ('«', '»')] {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            if !inner.contains(open) && !inner.contains(close) {
                return inner.trim();
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every call.
    struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: Mutex<Vec<(String, String, GenerationOptions)>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String, GenerationOptions)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            system: &str,
            prompt: &str,
            options: GenerationOptions,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string(), options));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn rate_limited() -> Result<String, LlmError> {
        Err(LlmError::RateLimited("429".to_string()))
    }

    #[tokio::test]
    async fn test_blank_text_skips_service() {
        let generator = ScriptedGenerator::new(vec![]);
        let translator = FieldTranslator::new(generator.clone());
        let out = translator
            .translate("   ", LanguageCode::Fr, TranslateOptions::default())
            .await;
        assert_eq!(out, "   ");
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_translation_is_cleaned() {
        let generator = ScriptedGenerator::new(vec![Ok("  \"Ingénieur logiciel\"\n".to_string())]);
        let translator = FieldTranslator::new(generator.clone());
        let out = translator
            .translate("Software engineer", LanguageCode::Fr, TranslateOptions::default())
            .await;
        assert_eq!(out, "Ingénieur logiciel");

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("French"));
        assert!(calls[0].1.ends_with("Software engineer"));
    }

    #[tokio::test]
    async fn test_preserved_term_never_reaches_service() {
        let generator = ScriptedGenerator::new(vec![Ok("Ingénieur <<T0>> principal".to_string())]);
        let translator = FieldTranslator::new(generator.clone());
        let terms = vec!["Rust".to_string()];
        let out = translator
            .translate(
                "Principal Rust Engineer",
                LanguageCode::Fr,
                TranslateOptions {
                    preserve_terms: &terms,
                    field: "job title",
                },
            )
            .await;
        assert_eq!(out, "Ingénieur Rust principal");

        let calls = generator.calls();
        assert!(!calls[0].1.contains("Rust"));
        assert!(calls[0].1.contains("<<T0>>"));
        assert!(calls[0].0.contains("placeholders"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_service_returns_original() {
        let generator = ScriptedGenerator::new(vec![rate_limited(), rate_limited(), rate_limited()]);
        let translator = FieldTranslator::new(generator.clone());
        let out = translator
            .translate("Led the payments team", LanguageCode::De, TranslateOptions::default())
            .await;
        assert_eq!(out, "Led the payments team");
        assert_eq!(generator.calls().len(), MAX_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn test_lost_placeholder_retries_hotter_and_longer() {
        let generator = ScriptedGenerator::new(vec![
            Ok("Ingeniero principal".to_string()),
            Ok("Ingeniero <<T0>> principal".to_string()),
        ]);
        let translator = FieldTranslator::new(generator.clone());
        let terms = vec!["Kotlin".to_string()];
        let out = translator
            .translate(
                "Principal Kotlin Engineer",
                LanguageCode::Es,
                TranslateOptions {
                    preserve_terms: &terms,
                    field: "job title",
                },
            )
            .await;
        assert_eq!(out, "Ingeniero Kotlin principal");

        let calls = generator.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].2.temperature > calls[0].2.temperature);
        assert!(calls[1].2.max_tokens > calls[0].2.max_tokens);
    }

    #[tokio::test]
    async fn test_lost_placeholder_on_every_attempt_keeps_original() {
        let generator = ScriptedGenerator::new(vec![
            Ok("Ingeniero principal".to_string()),
            Ok("Ingeniero jefe".to_string()),
        ]);
        let translator = FieldTranslator::new(generator);
        let terms = vec!["Kotlin".to_string()];
        let options = TranslateOptions {
            preserve_terms: &terms,
            field: "job title",
        };
        let err = translator
            .try_translate("Principal Kotlin Engineer", LanguageCode::Es, options)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::LostPlaceholder));
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let generator = ScriptedGenerator::new(vec![
            Err(LlmError::Api {
                status: 400,
                message: "invalid request".to_string(),
            }),
            Ok("never used".to_string()),
        ]);
        let translator = FieldTranslator::new(generator.clone());
        let out = translator
            .translate("Team lead", LanguageCode::It, TranslateOptions::default())
            .await;
        assert_eq!(out, "Team lead");
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backpressure_backs_off_before_retry() {
        let generator = ScriptedGenerator::new(vec![rate_limited(), Ok("Chef d'équipe".to_string())]);
        let translator =
            FieldTranslator::new(generator.clone()).with_backoff(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        let out = translator
            .translate("Team lead", LanguageCode::Fr, TranslateOptions::default())
            .await;
        assert_eq!(out, "Chef d'équipe");
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_empty_output_counts_as_failure() {
        let generator = ScriptedGenerator::new(vec![Ok("   ".to_string()), Ok("\"\"".to_string())]);
        let translator = FieldTranslator::new(generator.clone());
        let out = translator
            .translate("Mentor", LanguageCode::Pt, TranslateOptions::default())
            .await;
        assert_eq!(out, "Mentor");
        assert_eq!(generator.calls().len(), 2);
    }

    #[test]
    fn test_clean_output_strips_fences_and_quotes() {
        assert_eq!(clean_output("```\nBonjour\n```"), "Bonjour");
        assert_eq!(clean_output("```text\nBonjour\n```"), "Bonjour");
        assert_eq!(clean_output("«Bonjour»"), "Bonjour");
        assert_eq!(clean_output("\"a\" and \"b\""), "\"a\" and \"b\"");
        assert_eq!(clean_output("  plain  "), "plain");
    }

    #[test]
    fn test_options_for_attempt_bounds() {
        let first = options_for_attempt(0, "short");
        assert_eq!(first.max_tokens, MIN_OUTPUT_TOKENS);
        assert!((first.temperature - BASE_TEMPERATURE).abs() < f32::EPSILON);

        let huge = "x".repeat(100_000);
        assert_eq!(options_for_attempt(1, &huge).max_tokens, MAX_OUTPUT_TOKENS);
    }
}
