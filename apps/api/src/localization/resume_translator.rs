//! Resume Content Translator: orchestrates detection, normalization and per-field
//! translation across a whole resume.
//!
//! Flow: detect source → normalize source/target → (same? stamp tag) →
//!       translate summary, then each category with a bounded, order-preserving fan-out.
//!
//! Never fails. The worst observable outcome is "nothing was translated".

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::localization::detect::{identify, LanguageDetector};
use crate::localization::field_translator::{FieldTranslator, TranslateOptions};
use crate::localization::language::{LanguageCode, ProficiencyLevel};
use crate::localization::normalize::normalize_language_code;
use crate::models::resume::{
    Certification, Education, LanguageSkill, ResumeContent, Skill, WorkExperience,
};

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_DEADLINE: Duration = Duration::from_secs(90);

/// Tunables for the orchestrator, normally taken from `Config`.
#[derive(Debug, Clone)]
pub struct TranslatorSettings {
    /// Terms kept verbatim in every translated field.
    pub preserve_terms: Vec<String>,
    /// In-flight entries per category.
    pub concurrency: usize,
    /// Budget for one whole resume.
    pub deadline: Duration,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            preserve_terms: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

/// Result of one orchestration, with enough metadata for the HTTP layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationOutcome {
    pub resume: ResumeContent,
    pub source_language: LanguageCode,
    pub target_language: LanguageCode,
    /// False when source and target matched or the deadline expired.
    pub translated: bool,
}

#[derive(Clone)]
pub struct ResumeTranslator {
    detector: Arc<dyn LanguageDetector>,
    fields: FieldTranslator,
    settings: TranslatorSettings,
}

impl ResumeTranslator {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        fields: FieldTranslator,
        settings: TranslatorSettings,
    ) -> Self {
        Self {
            detector,
            fields,
            settings: TranslatorSettings {
                concurrency: settings.concurrency.max(1),
                ..settings
            },
        }
    }

    pub fn detector(&self) -> &dyn LanguageDetector {
        self.detector.as_ref()
    }

    /// Single entry point: `outcome.resume` is written in `target_language`. Also reports
    /// what was detected and whether anything changed.
    pub async fn translate(&self, resume: ResumeContent, target_language: &str) -> TranslationOutcome {
        let source = self.detect_source(&resume);
        let target = normalize_language_code(Some(target_language));

        if source == target {
            info!("Resume already in {target}, skipping translation");
            let mut resume = resume;
            resume.language = target.as_str().to_string();
            return TranslationOutcome {
                resume,
                source_language: source,
                target_language: target,
                translated: false,
            };
        }

        info!(
            "Translating resume {source} -> {target} ({} jobs, {} education entries)",
            resume.work_experience.len(),
            resume.education.len()
        );

        let fallback = resume.clone();
        match tokio::time::timeout(self.settings.deadline, self.translate_all(resume, target)).await
        {
            Ok(mut translated) => {
                translated.language = target.as_str().to_string();
                TranslationOutcome {
                    resume: translated,
                    source_language: source,
                    target_language: target,
                    translated: true,
                }
            }
            Err(_) => {
                warn!(
                    "Resume translation exceeded {}s deadline, returning untranslated content",
                    self.settings.deadline.as_secs()
                );
                let mut resume = fallback;
                resume.language = source.as_str().to_string();
                TranslationOutcome {
                    resume,
                    source_language: source,
                    target_language: target,
                    translated: false,
                }
            }
        }
    }

    /// Detects the language the resume is currently written in.
    ///
    /// Samples the summary, then the first non-empty job description, then the first
    /// non-empty education description. Falls back to the resume's own tag.
    pub fn detect_source(&self, resume: &ResumeContent) -> LanguageCode {
        let first_job = resume
            .work_experience
            .iter()
            .map(|job| job.description.as_str())
            .find(|d| !d.trim().is_empty());
        let first_education = resume
            .education
            .iter()
            .map(|edu| edu.description.as_str())
            .find(|d| !d.trim().is_empty());

        let candidates = std::iter::once(resume.summary.as_str())
            .chain(first_job)
            .chain(first_education);

        for sample in candidates {
            let identification = identify(self.detector.as_ref(), sample);
            if identification.is_determined() {
                return normalize_language_code(Some(identification.code()));
            }
        }

        normalize_language_code(Some(&resume.language))
    }

    async fn translate_all(&self, mut resume: ResumeContent, target: LanguageCode) -> ResumeContent {
        let concurrency = self.settings.concurrency;

        resume.summary = self
            .fields
            .translate(&resume.summary, target, self.options("professional summary"))
            .await;

        // Items are moved into their futures; `translate` must stay `Send` for axum.
        resume.work_experience = stream::iter(std::mem::take(&mut resume.work_experience))
            .map(|job| async move { self.translate_job(job, target).await })
            .buffered(concurrency)
            .collect()
            .await;

        resume.education = stream::iter(std::mem::take(&mut resume.education))
            .map(|edu| async move { self.translate_education(edu, target).await })
            .buffered(concurrency)
            .collect()
            .await;

        resume.certifications = stream::iter(std::mem::take(&mut resume.certifications))
            .map(|cert| async move { self.translate_certification(cert, target).await })
            .buffered(concurrency)
            .collect()
            .await;

        resume.skills = stream::iter(std::mem::take(&mut resume.skills))
            .map(|skill| async move { self.translate_skill(skill, target).await })
            .buffered(concurrency)
            .collect()
            .await;

        resume.languages = stream::iter(std::mem::take(&mut resume.languages))
            .map(|lang| async move { self.translate_language(lang, target).await })
            .buffered(concurrency)
            .collect()
            .await;

        resume
    }

    fn options<'a>(&'a self, field: &'a str) -> TranslateOptions<'a> {
        TranslateOptions {
            preserve_terms: &self.settings.preserve_terms,
            field,
        }
    }

    /// company, dates and techStack are carried over untouched.
    async fn translate_job(&self, job: WorkExperience, target: LanguageCode) -> WorkExperience {
        let mut title_terms = self.settings.preserve_terms.clone();
        title_terms.extend(job.tech_stack.iter().cloned());
        let title_options = TranslateOptions {
            preserve_terms: &title_terms,
            field: "job title",
        };

        let (job_title, location, description, company_description) = tokio::join!(
            self.fields.translate(&job.job_title, target, title_options),
            self.fields.translate(&job.location, target, self.options("job location")),
            self.fields
                .translate(&job.description, target, self.options("job description")),
            self.fields.translate(
                &job.company_description,
                target,
                self.options("company description")
            ),
        );

        WorkExperience {
            job_title,
            location,
            description,
            company_description,
            ..job
        }
    }

    /// institution and years are carried over untouched.
    async fn translate_education(&self, edu: Education, target: LanguageCode) -> Education {
        let (degree, major, description) = tokio::join!(
            self.fields.translate(&edu.degree, target, self.options("degree")),
            self.fields.translate(&edu.major, target, self.options("field of study")),
            self.fields
                .translate(&edu.description, target, self.options("education description")),
        );

        Education {
            degree,
            major,
            description,
            ..edu
        }
    }

    /// issuer and issue date are carried over untouched.
    async fn translate_certification(
        &self,
        cert: Certification,
        target: LanguageCode,
    ) -> Certification {
        let name = self
            .fields
            .translate(&cert.name, target, self.options("certification name"))
            .await;
        Certification {
            name,
            ..cert
        }
    }

    async fn translate_skill(&self, skill: Skill, target: LanguageCode) -> Skill {
        Skill {
            name: self
                .fields
                .translate(&skill.name, target, self.options("skill"))
                .await,
        }
    }

    /// Only the proficiency label is translated; the language name stays as written.
    async fn translate_language(&self, lang: LanguageSkill, target: LanguageCode) -> LanguageSkill {
        let field = proficiency_field(&lang.proficiency, target);
        let proficiency = self
            .fields
            .translate(&lang.proficiency, target, self.options(&field))
            .await;
        LanguageSkill {
            name: lang.name,
            proficiency,
        }
    }
}

/// Points the model at the target profile's standard term when the label is one we know.
fn proficiency_field(label: &str, target: LanguageCode) -> String {
    match ProficiencyLevel::from_label(label) {
        Some(level) => format!(
            "language proficiency level (the standard {} term is \"{}\")",
            target.profile().english_name,
            target.profile().proficiency_label(level)
        ),
        None => "language proficiency level".to_string(),
    }
}
