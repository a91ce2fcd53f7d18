//! QuickChat CLI Configuration Management
//!
//! Configuration is read from a TOML file. Every section and field is
//! optional; anything missing takes its default. `--data-dir` on the command
//! line overrides the configured data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use quickchat_core::QuickchatConfig;

/// Directory name used under the platform data directory
const APP_DIR_NAME: &str = "quickchat";

/// Fallback data directory when the platform has none
const FALLBACK_DATA_DIR: &str = ".quickchat";

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the QuickChat CLI application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Engine configuration
    #[serde(default)]
    pub core: QuickchatConfig,

    /// CLI-specific configuration
    #[serde(default)]
    pub cli: CliConfig,
}

/// CLI-specific configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Prompt shown before menu choices
    pub prompt: String,

    /// Directory holding the message archive
    pub data_dir: Option<PathBuf>,

    /// Archive file name inside the data directory
    pub archive_file: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            prompt: "quickchat> ".to_string(),
            data_dir: None,
            archive_file: "stored_messages.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Loading(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: AppConfig = toml::from_str(&contents).map_err(|e| {
            ConfigError::Loading(format!("Failed to load from {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::FileSystem(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), toml_string)
            .map_err(|e| ConfigError::FileSystem(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.core.validate().map_err(ConfigError::Validation)?;

        let file = Path::new(&self.cli.archive_file);
        if self.cli.archive_file.trim().is_empty() || file.file_name().is_none() {
            return Err(ConfigError::Validation(
                "Archive file name must not be empty".to_string(),
            ));
        }
        if file.components().count() != 1 {
            return Err(ConfigError::Validation(format!(
                "Archive file must be a plain file name, got {}",
                self.cli.archive_file
            )));
        }

        Ok(())
    }

    /// Directory holding persistent data
    pub fn data_dir(&self) -> PathBuf {
        self.cli.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Full path of the message archive
    pub fn archive_path(&self) -> PathBuf {
        self.data_dir().join(&self.cli.archive_file)
    }

    /// Create example configuration file content
    pub fn example_config() -> String {
        let example_config = AppConfig {
            cli: CliConfig {
                data_dir: Some(PathBuf::from("/var/lib/quickchat")),
                ..CliConfig::default()
            },
            ..Default::default()
        };

        toml::to_string_pretty(&example_config)
            .unwrap_or_else(|_| "# Failed to generate example config".to_string())
    }
}

/// Platform data directory for QuickChat
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
