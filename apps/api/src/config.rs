use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::analyzer::SkillVocabulary;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub search: Option<SearchCredentials>,
    pub search_endpoint: String,
    pub http_timeout: Duration,
    pub http_max_retries: u32,
    pub max_upload_bytes: usize,
    /// Bytes of a fetched job page that are read; the rest is dropped.
    pub max_page_bytes: usize,
    pub skill_vocabulary: Option<Vec<String>>,
    pub port: u16,
    pub rust_log: String,
}

/// API key plus search-scope identifier for the search collaborator.
#[derive(Debug, Clone)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let search = match (optional_env("SEARCH_API_KEY"), optional_env("SEARCH_ENGINE_ID")) {
            (Some(api_key), Some(engine_id)) => Some(SearchCredentials { api_key, engine_id }),
            _ => None,
        };

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            search,
            search_endpoint: optional_env("SEARCH_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string()),
            http_timeout: Duration::from_secs(parse_env("HTTP_TIMEOUT_SECS", 15)?),
            http_max_retries: parse_env("HTTP_MAX_RETRIES", 2)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            max_page_bytes: parse_env("MAX_PAGE_BYTES", DEFAULT_MAX_PAGE_BYTES)?,
            skill_vocabulary: optional_env("SKILL_VOCABULARY").map(|raw| split_list(&raw)),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The skill vocabulary for this process: the configured override, or the built-in list.
    pub fn vocabulary(&self) -> SkillVocabulary {
        match &self.skill_vocabulary {
            Some(skills) => SkillVocabulary::new(skills),
            None => SkillVocabulary::default(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty_items() {
        assert_eq!(
            split_list(" rust, go ,,machine learning ,"),
            vec!["rust", "go", "machine learning"]
        );
    }

    #[test]
    fn test_vocabulary_override_replaces_default() {
        let config = Config {
            google_api_key: "key".to_string(),
            search: None,
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            http_timeout: Duration::from_secs(1),
            http_max_retries: 0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            skill_vocabulary: Some(vec!["Rust".to_string(), "Go".to_string()]),
            port: 8080,
            rust_log: "info".to_string(),
        };
        let vocabulary = config.vocabulary();
        assert_eq!(vocabulary.skills(), &["rust".to_string(), "go".to_string()]);
    }
}
