use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::controller::PreviewLimits;

/// Everything read from clipman.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Built-in theme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Show the history id column
    #[serde(default = "default_true")]
    pub show_numbers: bool,

    /// Forced UI language tag, empty for automatic
    #[serde(default)]
    pub interface_locale: String,

    /// Log file level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Minimum level forwarded to the panel as flash messages
    #[serde(default = "default_flash_level")]
    pub flash_level: String,

    #[serde(default = "default_flash_duration")]
    pub flash_message_duration_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            theme: default_theme(),
            show_numbers: true,
            interface_locale: String::new(),
            log_level: default_log_level(),
            flash_level: default_flash_level(),
            flash_message_duration_ms: default_flash_duration(),
        }
    }
}

/// External programs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_history_tool")]
    pub history: String,

    #[serde(default = "default_copy_tool")]
    pub copy: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            history: default_history_tool(),
            copy: default_copy_tool(),
        }
    }
}

/// Preview panel bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_text_limit")]
    pub text_limit: usize,

    #[serde(default = "default_image_max_px")]
    pub image_max_px: u32,

    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            text_limit: default_text_limit(),
            image_max_px: default_image_max_px(),
            cache_size: default_cache_size(),
        }
    }
}

impl PreviewConfig {
    pub fn limits(&self) -> PreviewLimits {
        PreviewLimits {
            text_limit: self.text_limit,
            image_max_px: self.image_max_px,
        }
    }
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_flash_level() -> String {
    "error".to_string()
}

fn default_flash_duration() -> u64 {
    3000
}

fn default_history_tool() -> String {
    "cliphist".to_string()
}

fn default_copy_tool() -> String {
    "wl-copy".to_string()
}

fn default_text_limit() -> usize {
    2048
}

fn default_image_max_px() -> u32 {
    512
}

fn default_cache_size() -> usize {
    20
}

/// Default configuration file, also the documentation of every option
pub const EXAMPLE_CONFIG: &str = include_str!("../../clipman.toml.example");

/// Where the configuration lives and how it is read
pub trait ConfigStorage {
    /// Read the configuration, writing the default file first when there is none
    fn load(&self) -> Result<Config>;

    fn path(&self) -> &Path;

    /// Write [`EXAMPLE_CONFIG`] to [`ConfigStorage::path`]
    fn create_default(&self) -> Result<()>;
}

/// Configuration in a single TOML file
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, writing the default one", self.path);
                self.create_default()?;
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config from {:?}", self.path));
            }
        };

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {:?}", self.path))?;
        log::debug!(
            "Config {:?}: history={}, copy={}, theme={}",
            self.path,
            config.tools.history,
            config.tools.copy,
            config.general.theme
        );
        Ok(config)
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("Invalid config path {:?}", self.path))?;
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        fs::write(&self.path, EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write default config {:?}", self.path))
    }
}
