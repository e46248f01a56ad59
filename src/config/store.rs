//! Document store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Storage backend
    #[serde(default)]
    pub backend: StoreBackend,

    /// Directory holding the ticket snapshot (file backend only)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Storage backend type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// YAML snapshot on local disk
    #[default]
    File,
    /// Process memory; lost on restart
    Memory,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StoreBackend::File && self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORE__DATA_DIR"));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ticket_store")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::File);
        assert_eq!(config.data_dir, PathBuf::from("./ticket_store"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_backend_requires_data_dir() {
        let config = StoreConfig {
            data_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_backend_ignores_data_dir() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            data_dir: PathBuf::new(),
        };
        assert!(config.validate().is_ok());
    }
}
