//! Preserve-term protection.
//!
//! Whole-word, case-insensitive occurrences of each preserved term are swapped for
//! positional placeholders (`<<T0>>`, `<<T1>>`, ...) before text generation and
//! swapped back afterwards with the exact text they replaced.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// Text with preserved terms masked out.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedText {
    pub text: String,
    /// Original text for placeholder `<<T{i}>>` at index `i`.
    originals: Vec<String>,
}

impl MaskedText {
    pub fn has_placeholders(&self) -> bool {
        !self.originals.is_empty()
    }

    /// Restores every placeholder in `translated`.
    ///
    /// Returns `None` if any placeholder is missing or an unknown one appears,
    /// which callers treat as a failed translation.
    pub fn restore(&self, translated: &str) -> Option<String> {
        if self.originals.is_empty() {
            return Some(translated.to_string());
        }

        let mut seen = vec![false; self.originals.len()];
        let mut out = String::with_capacity(translated.len());
        let mut last = 0;

        for caps in token_pattern().captures_iter(translated) {
            let whole = caps.get(0)?;
            let idx: usize = caps[1].parse().ok()?;
            let original = self.originals.get(idx)?;
            seen[idx] = true;
            out.push_str(&translated[last..whole.start()]);
            out.push_str(original);
            last = whole.end();
        }
        out.push_str(&translated[last..]);

        seen.iter().all(|s| *s).then_some(out)
    }
}

/// Tolerates the spacing and casing changes models sometimes make (`<< t0 >>`).
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<<\s*T(\d+)\s*>>").expect("static placeholder regex"))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Masks every whole-word occurrence of `terms` in `text`.
///
/// Longer terms claim their spans first; shorter terms never split a longer match.
pub fn mask_terms(text: &str, terms: &[String]) -> MaskedText {
    let mut ordered: Vec<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    ordered.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
    });
    ordered.dedup_by(|a, b| a.to_lowercase() == b.to_lowercase());

    let mut spans: Vec<(usize, usize)> = Vec::new();

    for term in ordered {
        let pattern = match Regex::new(&format!("(?i){}", regex::escape(term))) {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping preserve term {term:?}: {e}");
                continue;
            }
        };

        for m in pattern.find_iter(text) {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
                continue;
            }
            let overlaps = spans
                .iter()
                .any(|&(s, e)| m.start() < e && s < m.end());
            if !overlaps {
                spans.push((m.start(), m.end()));
            }
        }
    }

    spans.sort_unstable();

    let mut masked = String::with_capacity(text.len());
    let mut originals = Vec::with_capacity(spans.len());
    let mut last = 0;

    for (idx, (start, end)) in spans.into_iter().enumerate() {
        masked.push_str(&text[last..start]);
        masked.push_str(&format!("<<T{idx}>>"));
        originals.push(text[start..end].to_string());
        last = end;
    }
    masked.push_str(&text[last..]);

    MaskedText {
        text: masked,
        originals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_masks_whole_words_case_insensitively() {
        let masked = mask_terms("Senior rust engineer, RUST evangelist", &terms(&["Rust"]));
        assert_eq!(masked.text, "Senior <<T0>> engineer, <<T1>> evangelist");
        let restored = masked
            .restore("Ingénieur <<T0>> senior, évangéliste <<T1>>")
            .unwrap();
        assert_eq!(restored, "Ingénieur rust senior, évangéliste RUST");
    }

    #[test]
    fn test_does_not_match_inside_words() {
        let masked = mask_terms("Trusted Rustacean", &terms(&["Rust"]));
        assert_eq!(masked.text, "Trusted Rustacean");
        assert!(!masked.has_placeholders());
    }

    #[test]
    fn test_symbol_terms() {
        let masked = mask_terms("Wrote C++ and .NET services", &terms(&["c++", ".NET"]));
        assert_eq!(masked.text, "Wrote <<T0>> and <<T1>> services");
        assert_eq!(
            masked.restore("A écrit des services <<T0>> et <<T1>>").unwrap(),
            "A écrit des services C++ et .NET"
        );
    }

    #[test]
    fn test_longest_term_wins() {
        let masked = mask_terms(
            "Google Cloud Platform and Google Ads",
            &terms(&["Google", "Google Cloud Platform"]),
        );
        assert_eq!(masked.text, "<<T0>> and <<T1>> Ads");
        assert_eq!(
            masked.restore("<<T0>> y <<T1>> Ads").unwrap(),
            "Google Cloud Platform y Google Ads"
        );
    }

    #[test]
    fn test_restore_rejects_missing_placeholder() {
        let masked = mask_terms("Kubernetes operator", &terms(&["Kubernetes"]));
        assert!(masked.restore("Opérateur").is_none());
    }

    #[test]
    fn test_restore_rejects_unknown_placeholder() {
        let masked = mask_terms("Kubernetes operator", &terms(&["Kubernetes"]));
        assert!(masked.restore("<<T0>> <<T7>>").is_none());
    }

    #[test]
    fn test_restore_tolerates_inner_spacing() {
        let masked = mask_terms("Kafka pipelines", &terms(&["Kafka"]));
        assert_eq!(
            masked.restore("Pipelines << T0 >>").unwrap(),
            "Pipelines Kafka"
        );
        assert_eq!(masked.restore("pipelines <<t0>>").unwrap(), "pipelines Kafka");
    }

    #[test]
    fn test_blank_terms_ignored() {
        let masked = mask_terms("plain text", &terms(&["", "   "]));
        assert_eq!(masked.text, "plain text");
        assert_eq!(masked.restore("texte").unwrap(), "texte");
    }
}
