use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_DEADLINE_SECS: u64 = 90;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Max in-flight entries per resume category.
    pub translation_concurrency: usize,
    pub translation_deadline: Duration,
    /// Base delay before retrying a rate-limited field translation.
    pub translation_retry_backoff: Duration,
    /// Terms copied verbatim into every translation (product names, acronyms).
    pub preserve_terms: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let translation_concurrency = match lookup("TRANSLATION_CONCURRENCY") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .context("TRANSLATION_CONCURRENCY must be a positive integer")?,
            None => DEFAULT_CONCURRENCY,
        };
        if translation_concurrency == 0 {
            bail!("TRANSLATION_CONCURRENCY must be at least 1");
        }

        let deadline_secs = match lookup("TRANSLATION_DEADLINE_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .context("TRANSLATION_DEADLINE_SECS must be a whole number of seconds")?,
            None => DEFAULT_DEADLINE_SECS,
        };

        let backoff_ms = match lookup("TRANSLATION_RETRY_BACKOFF_MS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .context("TRANSLATION_RETRY_BACKOFF_MS must be a whole number of milliseconds")?,
            None => DEFAULT_RETRY_BACKOFF_MS,
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            translation_concurrency,
            translation_deadline: Duration::from_secs(deadline_secs),
            translation_retry_backoff: Duration::from_millis(backoff_ms),
            preserve_terms: parse_terms(lookup("PRESERVE_TERMS").as_deref().unwrap_or("")),
        })
    }
}

fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/resumes"),
        ("ANTHROPIC_API_KEY", "sk-test"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.translation_concurrency, 4);
        assert_eq!(config.translation_deadline, Duration::from_secs(90));
        assert_eq!(config.translation_retry_backoff, Duration::from_millis(500));
        assert!(config.preserve_terms.is_empty());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = load(&REQUIRED[..1]).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "9000"),
            ("TRANSLATION_CONCURRENCY", "8"),
            ("TRANSLATION_DEADLINE_SECS", "30"),
            ("PRESERVE_TERMS", "Kubernetes, GraphQL,, ,AWS"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.translation_concurrency, 8);
        assert_eq!(config.translation_deadline, Duration::from_secs(30));
        assert_eq!(config.preserve_terms, vec!["Kubernetes", "GraphQL", "AWS"]);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("TRANSLATION_CONCURRENCY", "0"));
        assert!(load(&vars).is_err());

        let mut vars = REQUIRED.to_vec();
        vars.push(("TRANSLATION_CONCURRENCY", "many"));
        assert!(load(&vars).is_err());
    }
}
