use serde::Deserialize;
use std::path::Path;

/// Name the assistant introduces itself with in chat.
pub const APP_NAME: &str = "Study Session AI";

/// Runtime configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM settings ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// Minimum trimmed character count for a usable context window
    pub min_context_chars: usize,
    /// Character cap on the context sent with each chat message
    pub chat_context_chars: usize,
    /// Character cap on the context sent to the video recommender
    pub recommendation_context_chars: usize,
    /// Base URL of the per-video thumbnail resource used for existence probes
    pub thumbnail_base_url: String,
    /// Directory for persisted transcripts and attempt history
    pub storage_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            min_context_chars: 100,
            chat_context_chars: 20_000,
            recommendation_context_chars: 5_000,
            thumbnail_base_url: "https://img.youtube.com".to_string(),
            storage_dir: ".study_session".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            min_context_chars: std::env::var("MIN_CONTEXT_CHARS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.min_context_chars),
            chat_context_chars: std::env::var("CHAT_CONTEXT_CHARS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.chat_context_chars),
            recommendation_context_chars: std::env::var("RECOMMENDATION_CONTEXT_CHARS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.recommendation_context_chars),
            thumbnail_base_url: std::env::var("THUMBNAIL_BASE_URL").unwrap_or(default.thumbnail_base_url),
            storage_dir: std::env::var("STORAGE_DIR").unwrap_or(default.storage_dir),
        }
    }

    /// Load configuration from a TOML file; missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}
