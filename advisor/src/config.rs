//! Advisor configuration

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strategist::{LlmError, OpenAiBackend, Strategist, StrategistConfig, OPENAI_BASE_URL};
use tracing::{info, warn};

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Chat-completion endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API root, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token. Without one the canned strategy is used.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Completion token limit
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (backend default when unset)
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Pause between answers during run-to-completion auto-fill
    #[serde(default = "default_auto_fill_delay")]
    pub auto_fill_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_fill_delay_ms: default_auto_fill_delay(),
        }
    }
}

// Defaults
fn default_base_url() -> String { OPENAI_BASE_URL.to_string() }
fn default_model() -> String { "gpt-4o".to_string() }
fn default_max_tokens() -> u32 { 2000 }
fn default_timeout_secs() -> u64 { 60 }
fn default_auto_fill_delay() -> u64 { 350 }

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a file, or use defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl SessionConfig {
    pub fn auto_fill_delay(&self) -> Duration {
        Duration::from_millis(self.auto_fill_delay_ms)
    }
}

impl LlmConfig {
    /// API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Build the strategist for these settings.
    ///
    /// Without an API key the strategist has no backend and always returns
    /// the canned strategy.
    pub fn strategist(&self) -> Result<Strategist, LlmError> {
        let strategist_config = StrategistConfig {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let Some(api_key) = self.api_key() else {
            warn!("No API key configured, strategies will use the built-in fallback");
            return Ok(Strategist::offline().with_config(strategist_config));
        };

        let backend = OpenAiBackend::new(
            &self.base_url,
            &self.model,
            Some(api_key.to_string()),
            Duration::from_secs(self.timeout_secs),
        )?;
        info!(model = %self.model, base_url = %self.base_url, "LLM backend configured");

        Ok(Strategist::new(vec![Arc::new(backend)]).with_config(strategist_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.session.auto_fill_delay(), Duration::from_millis(350));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = LlmConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);

        let strategist = config.strategist().unwrap();
        assert_eq!(strategist.backend_count(), 0);
    }

    #[test]
    fn test_api_key_enables_backend() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(config.strategist().unwrap().backend_count(), 1);
    }
}
