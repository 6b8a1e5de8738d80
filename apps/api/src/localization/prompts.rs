// All LLM prompt constants for the Localization module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for field translation.
/// Replace: {language_name}, {native_name}
pub const TRANSLATE_SYSTEM_TEMPLATE: &str = "You are a professional resume translator. \
    Translate the text you are given into {language_name} ({native_name}). \
    Keep the concise, professional register of a resume. \
    Keep numbers, dates, URLs, product names and acronyms exactly as written. \
    If the text is already in {language_name}, return it unchanged.";

/// Field translation prompt. The text to translate comes last, after `TEXT:`.
/// Replace: {field}, {language_name}, {text}
pub const TRANSLATE_PROMPT_TEMPLATE: &str = r#"Translate this resume {field} into {language_name}.

TEXT:
{text}"#;
