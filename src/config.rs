use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GlossaError, Result};

fn default_max_chunk_chars() -> usize {
    15000
}

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub endpoint: String,
    /// Model to use for translation
    pub model: String,
    /// API key; falls back to the OPENAI_API_KEY environment variable when empty
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-language-pair glossaries injected into the system prompt
    #[serde(default)]
    pub glossaries: Vec<GlossaryConfig>,
}

/// Terminology guidance for one language pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlossaryConfig {
    pub original_language: String,
    pub translated_language: String,
    /// Preferred source -> target renderings, e.g. ("Koło naukowe", "Science Club")
    #[serde(default)]
    pub preferred_terms: Vec<(String, String)>,
    /// Proper nouns that must never be translated
    #[serde(default)]
    pub keep_untranslated: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters; a single sentence longer than
    /// this is still emitted whole as an oversized chunk
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translator: TranslatorConfig {
                endpoint: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o".to_string(),
                api_key: String::new(),
                timeout_secs: default_timeout_secs(),
                glossaries: Vec::new(),
            },
            chunking: ChunkingConfig {
                max_chunk_chars: default_max_chunk_chars(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GlossaError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| GlossaError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlossaError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| GlossaError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chunk_limit() {
        let config = Config::default();
        assert_eq!(config.chunking.max_chunk_chars, 15000);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.translator.model, config.translator.model);
        assert_eq!(parsed.chunking.max_chunk_chars, 15000);
    }
}
