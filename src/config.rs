use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGES: [&str; 3] = ["en", "hi", "mr"];
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TEMPERATURE: f64 = 0.6;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_MAX_TRANSCRIPT_CHARS: usize = 15_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 60;

/// Environment variable holding the YouTube Data API key
pub const YOUTUBE_API_KEY_VAR: &str = "YOUTUBE_API_KEY";
/// Environment variable holding the chat-completion API key
pub const LLM_API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub languages: Option<Vec<String>>,
    pub fallback_language: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub max_transcript_chars: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub summary_timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from ~/.config/ytsummary/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Preferred manual caption languages, highest priority first
    pub fn languages(&self) -> Vec<String> {
        match &self.languages {
            Some(langs) if !langs.is_empty() => langs.clone(),
            _ => DEFAULT_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn fallback_language(&self) -> String {
        self.fallback_language
            .clone()
            .unwrap_or_else(|| DEFAULT_FALLBACK_LANGUAGE.to_string())
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn max_transcript_chars(&self) -> usize {
        self.max_transcript_chars.unwrap_or(DEFAULT_MAX_TRANSCRIPT_CHARS)
    }

    /// Deadline for metadata, caption and thumbnail requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn summary_timeout(&self) -> Duration {
        Duration::from_secs(self.summary_timeout_secs.unwrap_or(DEFAULT_SUMMARY_TIMEOUT_SECS))
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsummary")
        .join("config.toml")
}

/// Read a required API key from the environment
pub fn api_key(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(eyre::eyre!("{var} environment variable not set")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
languages = ["de", "en"]
fallback_language = "de"
model = "llama-3.3-70b-versatile"
base_url = "http://localhost:11434/v1/"
temperature = 0.2
max_tokens = 2048
request_timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.languages(), vec!["de".to_string(), "en".to_string()]);
        assert_eq!(config.fallback_language(), "de");
        assert_eq!(config.model(), "llama-3.3-70b-versatile");
        assert_eq!(config.base_url(), "http://localhost:11434/v1");
        assert_eq!(config.temperature(), 0.2);
        assert_eq!(config.max_tokens(), 2048);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.languages(), vec!["en", "hi", "mr"]);
        assert_eq!(config.fallback_language(), "en");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.temperature(), 0.6);
        assert_eq!(config.max_tokens(), 1024);
        assert_eq!(config.max_transcript_chars(), 15_000);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.summary_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_empty_language_list_falls_back_to_defaults() {
        let config: Config = toml::from_str("languages = []").unwrap();
        assert_eq!(config.languages(), vec!["en", "hi", "mr"]);
    }
}
