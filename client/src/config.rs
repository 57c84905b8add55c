use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::snake::{BotKind, Preset, SnakeSettings};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "snake_client_config.yaml";

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<Config, FileContentConfigProvider, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub player: Option<String>,
    pub game: GameConfig,
    pub store: StoreConfig,
    pub display: DisplayConfig,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        if let Some(player) = &self.player {
            common::PlayerName::parse(player)?;
        }
        self.game.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    pub preset: Preset,
    /// Full rule set; replaces the preset when present.
    #[serde(default)]
    pub rules: Option<SnakeSettings>,
    #[serde(default)]
    pub bot: Option<BotKind>,
}

impl GameConfig {
    pub fn settings(&self) -> SnakeSettings {
        match &self.rules {
            Some(rules) => rules.clone(),
            None => SnakeSettings::from_preset(self.preset),
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        match &self.rules {
            Some(rules) => rules.validate(),
            None => Ok(()),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    pub enabled: bool,
    pub database_path: String,
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.database_path.trim().is_empty() {
            return Err("store.database_path must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Draw the field as text each tick; otherwise only log score changes.
    pub draw_field: bool,
    pub clear_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: None,
            game: GameConfig {
                preset: Preset::Arcade,
                rules: None,
                bot: None,
            },
            store: StoreConfig {
                enabled: true,
                database_path: "snake_scores.db".to_string(),
            },
            display: DisplayConfig {
                draw_field: true,
                clear_screen: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigContentProvider, ConfigError, ConfigSerializer};

    fn get_temp_file_path() -> String {
        use std::env;
        let mut path = env::temp_dir();
        let random_number: u32 = rand::random();
        let file_name = format!("temp_snake_client_config_{}.yaml", random_number);
        path.push(file_name);
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer;
        let serialized = serializer.serialize(&default_config).unwrap();
        let deserialized: Config = serializer.deserialize(&serialized).unwrap();
        assert_eq!(default_config, deserialized);
    }

    #[test]
    fn test_config_with_rules_round_trips_through_file() {
        let mut config = Config::default();
        config.player = Some("alice".to_string());
        config.game.rules = Some(SnakeSettings::classic());
        config.game.bot = Some(BotKind::Greedy);

        let file_path = get_temp_file_path();
        let manager = get_config_manager(&file_path);
        manager.store(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(config, loaded);
        assert_eq!(loaded.game.settings(), SnakeSettings::classic());

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager = get_config_manager("this_file_does_not_exist.yaml");
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn test_preset_only_config_uses_preset_rules() {
        let content = r#"
            player: bob
            game:
              preset: classic
            store:
              enabled: false
              database_path: ""
            display:
              draw_field: false
              clear_screen: false
        "#;
        let file_path = get_temp_file_path();
        let provider = FileContentConfigProvider::new(file_path.clone());
        provider.set_config_content(content).unwrap();

        let manager: ConfigManager<Config, _, _> = ConfigManager::new(provider, YamlConfigSerializer);
        let config = manager.load().unwrap();
        assert_eq!(config.game.settings(), SnakeSettings::classic());
        assert_eq!(config.game.bot, None);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let content = r#"
            player: "   "
            game:
              preset: arcade
            store:
              enabled: true
              database_path: scores.db
            display:
              draw_field: true
              clear_screen: true
        "#;
        let file_path = get_temp_file_path();
        let provider = FileContentConfigProvider::new(file_path.clone());
        provider.set_config_content(content).unwrap();

        let manager: ConfigManager<Config, _, _> = ConfigManager::new(provider, YamlConfigSerializer);
        assert!(matches!(manager.load(), Err(ConfigError::Invalid(_))));

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_enabled_store_needs_path() {
        let mut config = Config::default();
        config.store.database_path = " ".to_string();
        assert!(config.validate().is_err());
    }
}
