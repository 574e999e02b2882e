use std::{path::Path, time::Duration};

use config::ConfigError;
use serde::Deserialize;

use crate::utils;

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: std::path::PathBuf,
    #[serde(default)]
    pub _config_dir: std::path::PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub components: ComponentsConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Inactivity timeout; `None` keeps views open until they exit
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ComponentsConfig {
    #[serde(default = "default_loading_label")]
    pub loading_label: String,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_history_limit() -> usize {
    100
}

fn default_max_items() -> usize {
    25
}

fn default_timeout_secs() -> Option<u64> {
    Some(180)
}

fn default_loading_label() -> String {
    String::from("Loading...")
}

fn default_cooldown_secs() -> u64 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ViewConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            loading_label: default_loading_label(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl ComponentsConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Config {
    /// Load the embedded defaults overlaid with any config file found in the
    /// project config directory
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_from(&utils::get_config_dir())
    }

    /// The configuration shipped with the crate
    pub fn embedded() -> Result<Self, ConfigError> {
        json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))
    }

    pub fn load_from(config_dir: &Path) -> Result<Self, ConfigError> {
        let data_dir = utils::get_data_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("_config_dir", config_dir.to_string_lossy().into_owned())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        if cfg.view.max_items == 0 {
            return Err(ConfigError::Message(String::from(
                "view.max_items must be at least 1",
            )));
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use pretty_assertions::assert_eq;

    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cascadeui-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_embedded_matches_defaults() {
        let cfg = Config::embedded().unwrap();

        assert_eq!(cfg.store, StoreConfig::default());
        assert_eq!(cfg.view, ViewConfig::default());
        assert_eq!(cfg.components, ComponentsConfig::default());
    }

    #[test]
    fn test_load_without_user_file_uses_defaults() {
        let dir = scratch_dir();
        let cfg = Config::load_from(&dir).unwrap();

        assert_eq!(cfg.store.history_limit, 100);
        assert_eq!(cfg.view.timeout(), Some(Duration::from_secs(180)));
        assert_eq!(cfg.config._config_dir, dir);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_user_file_overrides_defaults() {
        let dir = scratch_dir();
        fs::write(
            dir.join("config.toml"),
            "[store]\nhistory_limit = 7\n\n[components]\ncooldown_secs = 1\n",
        )
        .unwrap();

        let cfg = Config::load_from(&dir).unwrap();

        assert_eq!(cfg.store.history_limit, 7);
        assert_eq!(cfg.components.cooldown(), Duration::from_secs(1));
        assert_eq!(cfg.components.loading_label, "Loading...");
        assert_eq!(cfg.view.max_items, 25);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_zero_max_items_is_rejected() {
        let dir = scratch_dir();
        fs::write(dir.join("config.json"), r#"{"view": {"max_items": 0}}"#).unwrap();

        let err = Config::load_from(&dir).unwrap_err();
        assert!(format!("{err}").contains("max_items"));
        fs::remove_dir_all(dir).unwrap();
    }
}
