//! Configuration management for the Itchio2D engine.
//!
//! Loads engine settings from a TOML file, fills in defaults for missing
//! fields, and derives the per-game-type directories the engine reads
//! systems and assets from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::graphics::GraphicsApi;

fn default_tick_rate() -> u32 {
    60
}

fn default_game_data_path() -> String {
    "GameData".to_string()
}

fn default_game_type() -> String {
    "GameTypeA".to_string()
}

fn default_auto_load() -> bool {
    true
}

/// Application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window, graphics, game data and frame timing
    #[serde(default)]
    pub engine: EngineSettings,
    /// Dynamic system loading
    #[serde(default)]
    pub systems: SystemSettings,
    /// Log output
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub graphics_api: GraphicsApi,
    /// Root directory holding one subdirectory per game type
    #[serde(default = "default_game_data_path")]
    pub game_data_path: String,
    /// Game type to run; selects `<game_data_path>/<game_type>`
    #[serde(default = "default_game_type")]
    pub game_type: String,
    /// Fixed simulation ticks per second
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Frames to run before closing the window (0 runs until a shutdown signal)
    #[serde(default)]
    pub max_frames: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            window_title: "Itchio 2D Engine".to_string(),
            window_width: 1280,
            window_height: 720,
            graphics_api: GraphicsApi::OpenGl,
            game_data_path: default_game_data_path(),
            game_type: default_game_type(),
            tick_rate: default_tick_rate(),
            max_frames: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Directory override; empty means `<game_data_path>/<game_type>/Systems`
    #[serde(default)]
    pub directory: String,
    /// Whether to load the systems directory on startup
    #[serde(default = "default_auto_load")]
    pub auto_load: bool,
    /// Library file stems to load; empty loads everything
    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            directory: String::new(),
            auto_load: true,
            whitelist: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`.
    ///
    /// If the file does not exist a default configuration is written there
    /// and returned.
    pub async fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content)
                .await
                .with_context(|| format!("Failed to write default config {}", path.display()))?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Checks the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.engine.window_width == 0 || self.engine.window_height == 0 {
            return Err(format!(
                "Invalid window size: {}x{}",
                self.engine.window_width, self.engine.window_height
            ));
        }

        if self.engine.tick_rate == 0 {
            return Err("Tick rate must be greater than zero".to_string());
        }

        if self.engine.game_type.is_empty() {
            return Err("Game type cannot be empty".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }

    /// `<game_data_path>/<game_type>`
    pub fn game_type_dir(&self) -> PathBuf {
        Path::new(&self.engine.game_data_path).join(&self.engine.game_type)
    }

    pub fn systems_dir(&self) -> PathBuf {
        if self.systems.directory.is_empty() {
            self.game_type_dir().join("Systems")
        } else {
            PathBuf::from(&self.systems.directory)
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.game_type_dir().join("Assets")
    }

    pub fn asset_manifest(&self) -> PathBuf {
        self.assets_dir().join("Config").join("game_config.json")
    }
}

impl EngineSettings {
    /// Length of one fixed simulation step.
    pub fn timestep(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.engine.window_title, "Itchio 2D Engine");
        assert_eq!(config.engine.window_width, 1280);
        assert_eq!(config.engine.window_height, 720);
        assert_eq!(config.engine.graphics_api, GraphicsApi::OpenGl);
        assert_eq!(config.engine.game_data_path, "GameData");
        assert_eq!(config.engine.game_type, "GameTypeA");
        assert_eq!(config.engine.tick_rate, 60);
        assert_eq!(config.engine.max_frames, 0);

        assert!(config.systems.directory.is_empty());
        assert!(config.systems.auto_load);
        assert!(config.systems.whitelist.is_empty());

        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
    }

    #[test]
    fn test_derived_paths() {
        let mut config = AppConfig::default();
        config.engine.game_type = "GameTypeB".to_string();

        assert_eq!(config.game_type_dir(), PathBuf::from("GameData/GameTypeB"));
        assert_eq!(
            config.systems_dir(),
            PathBuf::from("GameData/GameTypeB/Systems")
        );
        assert_eq!(
            config.asset_manifest(),
            PathBuf::from("GameData/GameTypeB/Assets/Config/game_config.json")
        );

        config.systems.directory = "/opt/itchio/systems".to_string();
        assert_eq!(config.systems_dir(), PathBuf::from("/opt/itchio/systems"));
    }

    #[test]
    fn test_timestep() {
        let mut settings = EngineSettings::default();
        settings.tick_rate = 50;
        assert_eq!(settings.timestep(), Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();

        assert_eq!(config.engine.game_type, "GameTypeA");
        assert!(path.exists());

        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.engine.window_title, config.engine.window_title);
        assert_eq!(reloaded.engine.graphics_api, config.engine.graphics_api);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[engine]
window_title = "Itchio 2D - GameTypeB"
window_width = 800
window_height = 600
graphics_api = "directx11"
game_type = "GameTypeB"
tick_rate = 30
max_frames = 120

[systems]
directory = "custom_systems"
whitelist = ["system_physics"]

[logging]
level = "debug"
json_format = true
"#;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, toml_content).await.unwrap();

        let config = AppConfig::load_from_file(&path).await.unwrap();

        assert_eq!(config.engine.window_title, "Itchio 2D - GameTypeB");
        assert_eq!(config.engine.window_width, 800);
        assert_eq!(config.engine.graphics_api, GraphicsApi::DirectX11);
        assert_eq!(config.engine.game_data_path, "GameData");
        assert_eq!(config.engine.tick_rate, 30);
        assert_eq!(config.engine.max_frames, 120);
        assert_eq!(config.systems.directory, "custom_systems");
        assert!(config.systems.auto_load);
        assert_eq!(config.systems.whitelist, vec!["system_physics"]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[engine\nwindow_width = ").await.unwrap();

        let err = AppConfig::load_from_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_serde_deserialization_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[engine]
window_title = "Minimal"
window_width = 640
window_height = 480
graphics_api = "opengl"
"#,
        )
        .unwrap();

        assert_eq!(config.engine.tick_rate, 60);
        assert_eq!(config.engine.game_type, "GameTypeA");
        assert!(config.systems.auto_load);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.engine.window_width = 0;
        assert!(config.validate().unwrap_err().contains("Invalid window size"));

        let mut config = AppConfig::default();
        config.engine.tick_rate = 0;
        assert!(config.validate().unwrap_err().contains("Tick rate"));

        let mut config = AppConfig::default();
        config.engine.game_type.clear();
        assert!(config.validate().unwrap_err().contains("Game type"));

        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("Invalid log level"));
    }

    #[test]
    fn test_validation_valid_log_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "Level '{}' should be valid", level);
        }
    }
}
