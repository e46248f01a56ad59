//! Prompt window configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::ticket::PromptLimits;

/// Prompt window configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    /// Recent thread messages included in follow-up prompts
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Similar incidents retrieved per request
    #[serde(default = "default_similar_incidents")]
    pub similar_incidents: usize,

    /// Characters of each incident description shown to the model
    #[serde(default = "default_incident_preview_chars")]
    pub incident_preview_chars: usize,
}

impl PromptConfig {
    /// Composer limits for these settings
    pub fn limits(&self) -> PromptLimits {
        PromptLimits {
            history_window: self.history_window,
            similar_incidents: self.similar_incidents,
            incident_preview_chars: self.incident_preview_chars,
        }
    }

    /// Validate prompt configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_window == 0 {
            return Err(ValidationError::InvalidPromptLimit("history_window"));
        }
        if self.similar_incidents == 0 {
            return Err(ValidationError::InvalidPromptLimit("similar_incidents"));
        }
        Ok(())
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            similar_incidents: default_similar_incidents(),
            incident_preview_chars: default_incident_preview_chars(),
        }
    }
}

fn default_history_window() -> usize {
    6
}

fn default_similar_incidents() -> usize {
    5
}

fn default_incident_preview_chars() -> usize {
    220
}
