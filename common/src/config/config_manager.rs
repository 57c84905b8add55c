use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Format(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Config IO error: {}", e),
            ConfigError::Format(e) => write!(f, "Config format error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Config validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Loads and stores a validated config through a content provider and serializer.
///
/// A provider with no content yields `TConfig::default()`; nothing is written
/// back until `store` is called.
pub struct ConfigManager<TConfig, TProvider = FileContentConfigProvider, TSerializer = YamlConfigSerializer>
where
    TProvider: ConfigContentProvider,
    TSerializer: ConfigSerializer<TConfig>,
{
    provider: TProvider,
    serializer: TSerializer,
    _config: PhantomData<TConfig>,
}

impl<TConfig> ConfigManager<TConfig, FileContentConfigProvider, YamlConfigSerializer>
where
    TConfig: for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentConfigProvider::new(file_path), YamlConfigSerializer)
    }
}

impl<TConfig, TProvider, TSerializer> ConfigManager<TConfig, TProvider, TSerializer>
where
    TConfig: Validate + Default,
    TProvider: ConfigContentProvider,
    TSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(provider: TProvider, serializer: TSerializer) -> Self {
        Self {
            provider,
            serializer,
            _config: PhantomData,
        }
    }

    pub fn load(&self) -> Result<TConfig, ConfigError> {
        let Some(content) = self.provider.get_config_content().map_err(ConfigError::Io)? else {
            return Ok(TConfig::default());
        };

        let config = self
            .serializer
            .deserialize(&content)
            .map_err(ConfigError::Format)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn store(&self, config: &TConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;
        let content = self
            .serializer
            .serialize(config)
            .map_err(ConfigError::Format)?;
        self.provider
            .set_config_content(&content)
            .map_err(ConfigError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryContentConfigProvider;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        width: u32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self { width: 30 }
        }
    }

    impl Validate for Sample {
        fn validate(&self) -> Result<(), String> {
            if self.width == 0 {
                return Err("width must be positive".to_string());
            }
            Ok(())
        }
    }

    fn manager(content: Option<&str>) -> ConfigManager<Sample, MemoryContentConfigProvider> {
        let provider = match content {
            Some(c) => MemoryContentConfigProvider::with_content(c),
            None => MemoryContentConfigProvider::default(),
        };
        ConfigManager::new(provider, YamlConfigSerializer)
    }

    #[test]
    fn test_missing_content_gives_default() {
        assert_eq!(manager(None).load().unwrap(), Sample::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = manager(Some("width: 0\n")).load();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let result = manager(Some("width: [oops")).load();
        assert!(matches!(result, Err(ConfigError::Format(_))));
    }

    #[test]
    fn test_store_then_load() {
        let manager = manager(None);
        manager.store(&Sample { width: 12 }).unwrap();
        assert_eq!(manager.load().unwrap(), Sample { width: 12 });
    }

    #[test]
    fn test_store_rejects_invalid() {
        let manager = manager(None);
        assert!(manager.store(&Sample { width: 0 }).is_err());
        assert_eq!(manager.load().unwrap(), Sample::default());
    }
}
