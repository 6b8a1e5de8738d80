//! Language code normalization: free-form locale strings → `LanguageCode`.
//!
//! Total and pure. Anything unrecognised becomes English.

use crate::localization::language::LanguageCode;

const ALIASES: &[(&str, LanguageCode)] = &[
    ("english", LanguageCode::En),
    ("anglais", LanguageCode::En),
    ("ingles", LanguageCode::En),
    ("englisch", LanguageCode::En),
    ("eng", LanguageCode::En),
    ("french", LanguageCode::Fr),
    ("francais", LanguageCode::Fr),
    ("frances", LanguageCode::Fr),
    ("franzosisch", LanguageCode::Fr),
    ("fra", LanguageCode::Fr),
    ("fre", LanguageCode::Fr),
    ("spanish", LanguageCode::Es),
    ("espanol", LanguageCode::Es),
    ("castellano", LanguageCode::Es),
    ("espagnol", LanguageCode::Es),
    ("spanisch", LanguageCode::Es),
    ("spa", LanguageCode::Es),
    ("german", LanguageCode::De),
    ("deutsch", LanguageCode::De),
    ("allemand", LanguageCode::De),
    ("aleman", LanguageCode::De),
    ("deu", LanguageCode::De),
    ("ger", LanguageCode::De),
    ("italian", LanguageCode::It),
    ("italiano", LanguageCode::It),
    ("italien", LanguageCode::It),
    ("ita", LanguageCode::It),
    ("portuguese", LanguageCode::Pt),
    ("portugues", LanguageCode::Pt),
    ("portugais", LanguageCode::Pt),
    ("por", LanguageCode::Pt),
];

/// Maps any language identifier to a supported code.
///
/// Steps: lower-case, trim, strip diacritics, collapse whitespace/underscores to `-`;
/// then canonical set → alias table → primary subtag (`fr-CA` → `fr`) → `en`.
pub fn normalize_language_code(raw: Option<&str>) -> LanguageCode {
    let Some(raw) = raw else {
        return LanguageCode::default();
    };

    let key = canonical_key(raw);
    if key.is_empty() {
        return LanguageCode::default();
    }

    lookup(&key)
        .or_else(|| key.split('-').next().and_then(lookup))
        .unwrap_or_default()
}

fn lookup(key: &str) -> Option<LanguageCode> {
    LanguageCode::from_canonical(key).or_else(|| {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, code)| *code)
    })
}

fn canonical_key(raw: &str) -> String {
    let folded = strip_diacritics(&raw.trim().to_lowercase());
    folded
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Folds the Latin diacritics that appear in language names to plain ASCII.
fn strip_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => out.push('a'),
            'ç' | 'ć' | 'č' => out.push('c'),
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' | 'ī' => out.push('i'),
            'ñ' | 'ń' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => out.push('o'),
            'ù' | 'ú' | 'û' | 'ü' | 'ū' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            _ => out.push(c),
        }
    }
    out
}
