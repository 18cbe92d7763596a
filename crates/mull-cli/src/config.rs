//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for mull
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model to start with
    pub model: Option<String>,
    /// Base URL of the inference server
    pub base_url: Option<String>,
    /// File listing the selectable models, one per line
    pub models_file: Option<String>,
    /// Per-turn deadline in seconds; unset means no deadline
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mull")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("MULL_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`. A missing or broken file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        Self::init_at(&path)?;
        Ok(path)
    }

    fn init_at(path: &Path) -> std::io::Result<()> {
        if path.exists() {
            return Ok(());
        }

        let default_config = Config {
            model: Some(mull_ai::models::DEFAULT_MODEL.to_string()),
            base_url: Some(mull_ai::DEFAULT_BASE_URL.to_string()),
            models_file: Some(mull_ai::models::DEFAULT_MODELS_FILE.to_string()),
            timeout_secs: None,
        };
        default_config.save_to(path)
    }

    /// Per-turn deadline, if configured. Zero means none.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# mull configuration file
# Place at ~/.config/mull/config.toml (Linux/Mac) or %APPDATA%\mull\config.toml (Windows)
# or point MULL_CONFIG_PATH at another file.

# Model to start with
model = "deepseek-r1:1.5b"

# Inference server
base_url = "http://localhost:11434"

# Models offered by /model and --list-models, one name per line.
# When the file is missing or empty only the default model is offered.
models_file = "models.txt"

# Give up on a turn after this many seconds (unset waits forever)
# timeout_secs = 300
"#
}
