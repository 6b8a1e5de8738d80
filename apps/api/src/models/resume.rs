//! Resume content: the transient per-request value the localization pipeline works on.
//!
//! Optional and nullable input is defaulted HERE, at deserialization, so nothing
//! downstream needs to re-check for missing fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AppError;

pub const DEFAULT_LANGUAGE: &str = "en";
const PRESENT: &str = "Present";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn language_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_language))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearInput {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `2019`, `2019.0`, `"2019"` or `" 2019 "`. Anything else becomes `None`.
fn year_from_any<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let year = match Option::<YearInput>::deserialize(deserializer)? {
        Some(YearInput::Int(n)) => i32::try_from(n).ok(),
        Some(YearInput::Float(f)) if f.fract() == 0.0 => i32::try_from(f as i64).ok(),
        Some(YearInput::Text(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    Ok(year)
}

/// Full resume payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<LanguageSkill>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,
    #[serde(default = "default_language", deserialize_with = "language_or_default")]
    pub language: String,
}

impl Default for ResumeContent {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: None,
            location: None,
            website: None,
            linkedin: None,
            summary: String::new(),
            work_experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            languages: Vec::new(),
            certifications: Vec::new(),
            language: default_language(),
        }
    }
}

impl ResumeContent {
    /// Rejects structurally unusable input before any translation work starts.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("fullName cannot be empty".to_string()));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(
                "email must be a valid address".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
    /// Proper noun, never translated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default)]
    pub end_date: EndDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tech_stack: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub major: String,
    /// Proper noun, never translated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "year_from_any")]
    pub start_year: Option<i32>,
    #[serde(default, deserialize_with = "year_from_any")]
    pub graduation_year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A spoken language and the holder's proficiency in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    /// Never translated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proficiency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Never translated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub issuer: String,
    #[serde(default)]
    pub issue_date: Option<String>,
}

/// End of a work period. A missing, null, blank or "present" value means ongoing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EndDate {
    #[default]
    Present,
    Date(String),
}

impl EndDate {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None => EndDate::Present,
            Some(s) if s.is_empty() || s.eq_ignore_ascii_case(PRESENT) => EndDate::Present,
            Some(s) => EndDate::Date(s.to_string()),
        }
    }

    /// Storage form: `None` for an ongoing position.
    pub fn as_date(&self) -> Option<&str> {
        match self {
            EndDate::Present => None,
            EndDate::Date(d) => Some(d),
        }
    }
}

impl Serialize for EndDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EndDate::Present => serializer.serialize_str(PRESENT),
            EndDate::Date(d) => serializer.serialize_str(d),
        }
    }
}

impl<'de> Deserialize<'de> for EndDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(EndDate::from_raw(raw.as_deref()))
    }
}
