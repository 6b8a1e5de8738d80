//! Supported languages and their per-language configuration.
//!
//! Every lookup goes through the closed `LanguageCode` enum. Unknown keys fail
//! closed to the English profile.

use std::fmt;

use serde::{Serialize, Serializer};

/// Canonical set of languages the service can translate into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    #[default]
    En,
    Fr,
    Es,
    De,
    It,
    Pt,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::En,
        LanguageCode::Fr,
        LanguageCode::Es,
        LanguageCode::De,
        LanguageCode::It,
        LanguageCode::Pt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Fr => "fr",
            LanguageCode::Es => "es",
            LanguageCode::De => "de",
            LanguageCode::It => "it",
            LanguageCode::Pt => "pt",
        }
    }

    /// Exact canonical match only. Free-form input goes through `normalize_language_code`.
    pub fn from_canonical(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    pub fn profile(self) -> &'static LanguageProfile {
        match self {
            LanguageCode::En => &ENGLISH,
            LanguageCode::Fr => &FRENCH,
            LanguageCode::Es => &SPANISH,
            LanguageCode::De => &GERMAN,
            LanguageCode::It => &ITALIAN,
            LanguageCode::Pt => &PORTUGUESE,
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LanguageCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Section headings used by the resume templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTitles {
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
    pub languages: &'static str,
    pub certifications: &'static str,
}

/// Labels for the canonical proficiency levels, in the profile's language.
#[derive(Debug, Clone, Serialize)]
pub struct ProficiencyLabels {
    pub native: &'static str,
    pub fluent: &'static str,
    pub professional: &'static str,
    pub intermediate: &'static str,
    pub basic: &'static str,
}

impl ProficiencyLabels {
    fn as_array(&self) -> [&'static str; 5] {
        [
            self.native,
            self.fluent,
            self.professional,
            self.intermediate,
            self.basic,
        ]
    }
}

/// Canonical proficiency levels. The array order in `ProficiencyLabels::as_array`
/// follows this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProficiencyLevel {
    Native,
    Fluent,
    Professional,
    Intermediate,
    Basic,
}

impl ProficiencyLevel {
    const ORDER: [ProficiencyLevel; 5] = [
        ProficiencyLevel::Native,
        ProficiencyLevel::Fluent,
        ProficiencyLevel::Professional,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Basic,
    ];

    /// Recognises a label written in any supported language (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        LanguageCode::ALL.into_iter().find_map(|code| {
            code.profile()
                .proficiency
                .as_array()
                .iter()
                .position(|l| l.to_lowercase() == wanted)
                .map(|idx| Self::ORDER[idx])
        })
    }
}

/// Per-language configuration record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProfile {
    pub code: LanguageCode,
    pub english_name: &'static str,
    pub native_name: &'static str,
    pub section_titles: SectionTitles,
    pub proficiency: ProficiencyLabels,
}

impl LanguageProfile {
    pub fn proficiency_label(&self, level: ProficiencyLevel) -> &'static str {
        match level {
            ProficiencyLevel::Native => self.proficiency.native,
            ProficiencyLevel::Fluent => self.proficiency.fluent,
            ProficiencyLevel::Professional => self.proficiency.professional,
            ProficiencyLevel::Intermediate => self.proficiency.intermediate,
            ProficiencyLevel::Basic => self.proficiency.basic,
        }
    }
}

static ENGLISH: LanguageProfile = LanguageProfile {
    code: LanguageCode::En,
    english_name: "English",
    native_name: "English",
    section_titles: SectionTitles {
        summary: "Professional Summary",
        experience: "Work Experience",
        education: "Education",
        skills: "Skills",
        languages: "Languages",
        certifications: "Certifications",
    },
    proficiency: ProficiencyLabels {
        native: "Native",
        fluent: "Fluent",
        professional: "Professional",
        intermediate: "Intermediate",
        basic: "Basic",
    },
};

static FRENCH: LanguageProfile = LanguageProfile {
    code: LanguageCode::Fr,
    english_name: "French",
    native_name: "Français",
    section_titles: SectionTitles {
        summary: "Profil professionnel",
        experience: "Expérience professionnelle",
        education: "Formation",
        skills: "Compétences",
        languages: "Langues",
        certifications: "Certifications",
    },
    proficiency: ProficiencyLabels {
        native: "Langue maternelle",
        fluent: "Courant",
        professional: "Professionnel",
        intermediate: "Intermédiaire",
        basic: "Notions",
    },
};

static SPANISH: LanguageProfile = LanguageProfile {
    code: LanguageCode::Es,
    english_name: "Spanish",
    native_name: "Español",
    section_titles: SectionTitles {
        summary: "Perfil profesional",
        experience: "Experiencia laboral",
        education: "Formación académica",
        skills: "Habilidades",
        languages: "Idiomas",
        certifications: "Certificaciones",
    },
    proficiency: ProficiencyLabels {
        native: "Nativo",
        fluent: "Fluido",
        professional: "Profesional",
        intermediate: "Intermedio",
        basic: "Básico",
    },
};

static GERMAN: LanguageProfile = LanguageProfile {
    code: LanguageCode::De,
    english_name: "German",
    native_name: "Deutsch",
    section_titles: SectionTitles {
        summary: "Profil",
        experience: "Berufserfahrung",
        education: "Ausbildung",
        skills: "Kenntnisse",
        languages: "Sprachen",
        certifications: "Zertifikate",
    },
    proficiency: ProficiencyLabels {
        native: "Muttersprache",
        fluent: "Fließend",
        professional: "Verhandlungssicher",
        intermediate: "Gute Kenntnisse",
        basic: "Grundkenntnisse",
    },
};

static ITALIAN: LanguageProfile = LanguageProfile {
    code: LanguageCode::It,
    english_name: "Italian",
    native_name: "Italiano",
    section_titles: SectionTitles {
        summary: "Profilo professionale",
        experience: "Esperienza lavorativa",
        education: "Istruzione",
        skills: "Competenze",
        languages: "Lingue",
        certifications: "Certificazioni",
    },
    proficiency: ProficiencyLabels {
        native: "Madrelingua",
        fluent: "Fluente",
        professional: "Professionale",
        intermediate: "Intermedio",
        basic: "Base",
    },
};

static PORTUGUESE: LanguageProfile = LanguageProfile {
    code: LanguageCode::Pt,
    english_name: "Portuguese",
    native_name: "Português",
    section_titles: SectionTitles {
        summary: "Resumo profissional",
        experience: "Experiência profissional",
        education: "Formação acadêmica",
        skills: "Competências",
        languages: "Idiomas",
        certifications: "Certificações",
    },
    proficiency: ProficiencyLabels {
        native: "Nativo",
        fluent: "Fluente",
        professional: "Profissional",
        intermediate: "Intermediário",
        basic: "Básico",
    },
};
