//! Test doubles and fixtures shared by several test modules.
#![cfg(test)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{GenerationOptions, LlmError, TextGenerator};
use crate::localization::detect::{DetectError, LanguageDetector, LanguageGuess};
use crate::models::resume::{
    Certification, Education, EndDate, LanguageSkill, ResumeContent, Skill, WorkExperience,
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum FakeMode {
    /// Lower-cases the text and appends " (tr)".
    Translate,
    /// Every call fails with a rate limit.
    Fail,
    /// Sleeps, then translates like `Translate`.
    Slow(Duration),
}

/// Deterministic stand-in for the text-generation service. Records every prompt.
pub(crate) struct FakeGenerator {
    mode: FakeMode,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub(crate) fn new(mode: FakeMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

/// The text under translation sits after the final `TEXT:` line of the prompt.
pub(crate) fn prompt_text(prompt: &str) -> &str {
    prompt
        .rsplit_once("TEXT:\n")
        .map(|(_, text)| text)
        .unwrap_or(prompt)
}

pub(crate) fn fake_translation(text: &str) -> String {
    format!("{} (tr)", text.to_lowercase())
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(
        &self,
        _system: &str,
        prompt: &str,
        _options: GenerationOptions,
    ) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.mode {
            FakeMode::Translate => Ok(fake_translation(prompt_text(prompt))),
            FakeMode::Fail => Err(LlmError::RateLimited("simulated outage".to_string())),
            FakeMode::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(fake_translation(prompt_text(prompt)))
            }
        }
    }
}

/// Always reports the same language, or nothing at all.
pub(crate) struct FixedDetector(pub Option<&'static str>);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<Vec<LanguageGuess>, DetectError> {
        Ok(self
            .0
            .map(|code| LanguageGuess {
                code: code.to_string(),
                confidence: 0.9,
            })
            .into_iter()
            .collect())
    }
}

/// English resume with 3 jobs and 2 education entries.
pub(crate) fn sample_resume() -> ResumeContent {
    ResumeContent {
        full_name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        phone: Some("+1 555 0100".to_string()),
        location: Some("Arlington, VA".to_string()),
        website: None,
        linkedin: None,
        summary: "Backend engineer focused on compilers and distributed systems.".to_string(),
        work_experience: vec![
            WorkExperience {
                job_title: "Senior Rust Engineer".to_string(),
                company: "Acme Corp".to_string(),
                location: "Remote".to_string(),
                start_date: "2021-03".to_string(),
                end_date: EndDate::Present,
                description: "Built the billing pipeline in Rust and Kafka.".to_string(),
                company_description: "Payments platform for small businesses.".to_string(),
                tech_stack: vec!["Rust".to_string(), "Kafka".to_string()],
            },
            WorkExperience {
                job_title: "Software Engineer".to_string(),
                company: "Initech".to_string(),
                location: "Austin, TX".to_string(),
                start_date: "2018-01".to_string(),
                end_date: EndDate::Date("2021-02".to_string()),
                description: "Maintained the reporting service.".to_string(),
                company_description: String::new(),
                tech_stack: vec!["Java".to_string()],
            },
            WorkExperience {
                job_title: "Intern".to_string(),
                company: "Globex".to_string(),
                location: "Springfield".to_string(),
                start_date: "2017-06".to_string(),
                end_date: EndDate::Date("2017-09".to_string()),
                description: "Automated test reporting.".to_string(),
                company_description: "Energy company.".to_string(),
                tech_stack: vec![],
            },
        ],
        education: vec![
            Education {
                degree: "Master of Science".to_string(),
                major: "Computer Science".to_string(),
                institution: "ETH Zürich".to_string(),
                start_year: Some(2015),
                graduation_year: Some(2017),
                description: "Thesis on static analysis.".to_string(),
            },
            Education {
                degree: "Bachelor of Science".to_string(),
                major: "Mathematics".to_string(),
                institution: "Yale University".to_string(),
                start_year: Some(2011),
                graduation_year: Some(2015),
                description: String::new(),
            },
        ],
        skills: vec![
            Skill {
                name: "Distributed systems".to_string(),
            },
            Skill {
                name: "Compiler design".to_string(),
            },
        ],
        languages: vec![LanguageSkill {
            name: "English".to_string(),
            proficiency: "Native".to_string(),
        }],
        certifications: vec![Certification {
            name: "Certified Kubernetes Administrator".to_string(),
            issuer: "Cloud Native Computing Foundation".to_string(),
            issue_date: Some("2022-05".to_string()),
        }],
        language: "en".to_string(),
    }
}
