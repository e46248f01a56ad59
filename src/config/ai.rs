//! Model provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Model provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which backend answers model calls
    #[serde(default)]
    pub provider: ModelProvider,

    /// Root URL of the OpenAI-compatible server (Ollama by default)
    #[serde(default = "default_llama_base_url")]
    pub llama_base_url: String,

    /// Model name passed to the OpenAI-compatible server
    #[serde(default = "default_llama_model")]
    pub llama_model: String,

    /// Optional bearer token for the OpenAI-compatible server
    pub llama_api_key: Option<String>,

    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Gemini REST root
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature for chat completions
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Model provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Llama served over an OpenAI-compatible API
    #[default]
    #[serde(alias = "ollama")]
    Llama,
    /// Google Gemini REST API
    Gemini,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Gemini is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key
            .as_ref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate model configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidModelTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }

        match self.provider {
            ModelProvider::Llama => {
                if self.llama_base_url.trim().is_empty() {
                    return Err(ValidationError::MissingRequired("AI__LLAMA_BASE_URL"));
                }
                if self.llama_model.trim().is_empty() {
                    return Err(ValidationError::MissingRequired("AI__LLAMA_MODEL"));
                }
            }
            ModelProvider::Gemini => {
                if !self.has_gemini() {
                    return Err(ValidationError::MissingRequired("AI__GEMINI_API_KEY"));
                }
                if self.gemini_model.trim().is_empty() {
                    return Err(ValidationError::MissingRequired("AI__GEMINI_MODEL"));
                }
                if self.gemini_base_url.trim().is_empty() {
                    return Err(ValidationError::MissingRequired("AI__GEMINI_BASE_URL"));
                }
            }
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            llama_base_url: default_llama_base_url(),
            llama_model: default_llama_model(),
            llama_api_key: None,
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_base_url: default_gemini_base_url(),
            timeout_secs: default_timeout(),
            temperature: default_temperature(),
        }
    }
}

fn default_llama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_llama_model() -> String {
    "meta-llama/Llama-3.1-8B-Instruct".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.provider, ModelProvider::Llama);
        assert_eq!(config.llama_base_url, "http://localhost:11434");
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.timeout_secs, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_ollama_alias_selects_llama() {
        let provider: ModelProvider = serde_json::from_str("\"ollama\"").unwrap();
        assert_eq!(provider, ModelProvider::Llama);
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let config = AiConfig {
            provider: ModelProvider::Gemini,
            gemini_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__GEMINI_API_KEY"))
        );

        let config = AiConfig {
            provider: ModelProvider::Gemini,
            gemini_api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidModelTimeout));
    }

    #[test]
    fn test_validation_rejects_out_of_range_temperature() {
        let config = AiConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature));
    }

    #[test]
    fn test_validation_rejects_empty_llama_model() {
        let config = AiConfig {
            llama_model: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
