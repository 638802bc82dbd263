use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HollyError, Result};

/// Top-level configuration for the Holly bot.
///
/// Loaded from `~/.holly/config.toml` by default. Every section falls back to
/// its defaults when absent, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HollyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub dialog: DialogConfig,
}

impl HollyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HollyConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| HollyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Interface the messaging endpoint binds to.
    pub host: String,
    /// Port for the messaging endpoint.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3978,
        }
    }
}

/// Holiday catalog source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to a JSON catalog. The embedded catalog is used when unset.
    pub path: Option<String>,
    /// Calendar name used when listing all holidays ("These are ALL US Holidays").
    pub label: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            label: "US".to_string(),
        }
    }
}

/// Intent recognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Results scoring below this are treated as unrecognized (0.0 to 1.0).
    pub min_score: f32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self { min_score: 0.3 }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Name the bot introduces itself with.
    pub bot_name: String,
    /// Idle minutes before a conversation is discarded.
    pub conversation_timeout_minutes: u32,
    /// Maximum accepted utterance length in characters.
    pub max_message_length: usize,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            bot_name: "Holly".to_string(),
            conversation_timeout_minutes: 30,
            max_message_length: 500,
        }
    }
}
