//! Reasoning endpoint configuration from TOML (`[reasoning]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completions endpoint.
///
/// ```toml
/// [reasoning]
/// base_url = "http://localhost:8000/v1"
/// model = "qwen2.5-7b-instruct"
/// api_key_env = "ARCHIVIST_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    /// Base URL up to and including the version segment
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key (default: "OPENAI_API_KEY")
    pub api_key_env: String,
    pub temperature: f32,
    /// Upper bound on tokens per reply; the endpoint default when unset
    pub max_tokens: Option<u32>,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.1,
            max_tokens: Some(1024),
        }
    }
}

impl FileReasoningConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
    }
}
