//! Provider selection - one closed set of backends chosen at startup.

use async_trait::async_trait;

use super::{GeminiBackend, GeminiConfig, OpenAiCompatibleBackend, OpenAiCompatibleConfig};
use crate::config::{AiConfig, ModelProvider};
use crate::ports::{ChatMessage, ModelBackend, ModelError, ProviderInfo};

/// The model backend selected by configuration.
pub enum ConfiguredModelBackend {
    Llama(OpenAiCompatibleBackend),
    Gemini(GeminiBackend),
}

impl ConfiguredModelBackend {
    /// Builds the backend named by `config.provider`.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` when the selected provider lacks required settings
    pub fn from_config(config: &AiConfig) -> Result<Self, ModelError> {
        match config.provider {
            ModelProvider::Llama => {
                let mut llama =
                    OpenAiCompatibleConfig::new(&config.llama_base_url, &config.llama_model)
                        .with_timeout(config.timeout())
                        .with_temperature(config.temperature);
                if let Some(key) = config.llama_api_key.as_deref().filter(|k| !k.is_empty()) {
                    llama = llama.with_api_key(key);
                }
                Ok(Self::Llama(OpenAiCompatibleBackend::new(llama)?))
            }
            ModelProvider::Gemini => {
                let key = config
                    .gemini_api_key
                    .as_deref()
                    .ok_or_else(|| ModelError::not_configured("GEMINI_API_KEY not configured"))?;
                let gemini = GeminiConfig::new(key)
                    .with_model(&config.gemini_model)
                    .with_base_url(&config.gemini_base_url)
                    .with_timeout(config.timeout());
                Ok(Self::Gemini(GeminiBackend::new(gemini)?))
            }
        }
    }
}

#[async_trait]
impl ModelBackend for ConfiguredModelBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        match self {
            Self::Llama(backend) => backend.complete(messages).await,
            Self::Gemini(backend) => backend.complete(messages).await,
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        match self {
            Self::Llama(backend) => backend.provider_info(),
            Self::Gemini(backend) => backend.provider_info(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_selects_llama() {
        let backend = ConfiguredModelBackend::from_config(&AiConfig::default()).unwrap();
        let info = backend.provider_info();
        assert_eq!(info.name, "llama");
        assert_eq!(info.model, "meta-llama/Llama-3.1-8B-Instruct");
    }

    #[test]
    fn gemini_selected_with_key() {
        let config = AiConfig {
            provider: ModelProvider::Gemini,
            gemini_api_key: Some("key".to_string()),
            gemini_model: "gemini-1.5-pro".to_string(),
            ..Default::default()
        };
        let backend = ConfiguredModelBackend::from_config(&config).unwrap();
        let info = backend.provider_info();
        assert_eq!(info.name, "gemini");
        assert_eq!(info.model, "gemini-1.5-pro");
    }

    #[test]
    fn gemini_without_key_is_not_configured() {
        let config = AiConfig {
            provider: ModelProvider::Gemini,
            ..Default::default()
        };
        assert!(matches!(
            ConfiguredModelBackend::from_config(&config),
            Err(ModelError::NotConfigured(_))
        ));
    }
}
