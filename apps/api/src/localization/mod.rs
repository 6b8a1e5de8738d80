// Resume Localization Pipeline
// Implements: language identification, code normalization, field translation and the
// whole-resume translator. All text generation goes through llm_client::TextGenerator.

pub mod detect;
pub mod field_translator;
pub mod handlers;
pub mod language;
pub mod normalize;
pub mod preserve;
pub mod prompts;
pub mod resume_translator;
