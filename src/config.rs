//! Codec configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default cap on a single bytes/text field: 16 MiB
pub const DEFAULT_MAX_FIELD_LEN: usize = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the record codec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest length prefix accepted when decoding bytes or text
    pub max_field_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

impl CodecConfig {
    /// Load from a JSON file; missing keys take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_field_len > u32::MAX as usize {
            return Err(ConfigError::Invalid(format!(
                "max_field_len {} exceeds the u32 length prefix",
                self.max_field_len
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default() {
        assert_eq!(CodecConfig::default().max_field_len, DEFAULT_MAX_FIELD_LEN);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_field_len": 1024}}"#).unwrap();

        let config = CodecConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_field_len, 1024);
    }

    #[test]
    fn test_from_file_missing_keys_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let config = CodecConfig::from_file(file.path()).unwrap();
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "max_field_len = 3").unwrap();

        assert!(matches!(
            CodecConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_limit() {
        let config = CodecConfig {
            max_field_len: u32::MAX as usize + 1,
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
