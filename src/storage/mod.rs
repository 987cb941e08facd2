pub mod config;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use config::{Config, ConfigStorage, GeneralConfig, PreviewConfig, TomlConfigStorage, ToolsConfig};

fn home_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home))
}

/// $XDG_DATA_HOME, defaulting to ~/.local/share
pub fn data_home() -> Result<PathBuf> {
    match env::var("XDG_DATA_HOME") {
        Ok(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(home_dir()?.join(".local/share")),
    }
}

/// $XDG_CONFIG_HOME, defaulting to ~/.config
pub fn config_home() -> Result<PathBuf> {
    match env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(home_dir()?.join(".config")),
    }
}

/// Ensure XDG data and config directories exist
/// Returns (data_dir, config_dir)
///
/// XDG Base Directory Specification:
/// - Data: $XDG_DATA_HOME/clipman (default: ~/.local/share/clipman)
/// - Config: $XDG_CONFIG_HOME/clipman (default: ~/.config/clipman)
pub fn ensure_directories() -> Result<(PathBuf, PathBuf)> {
    let data_dir = data_home()?.join("clipman");
    let config_dir = config_home()?.join("clipman");

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

    log::debug!("Data directory: {:?}", data_dir);
    log::debug!("Config directory: {:?}", config_dir);

    Ok((data_dir, config_dir))
}

/// The nwg-shell data file that may force an interface locale
pub fn shell_data_file() -> Result<PathBuf> {
    Ok(data_home()?.join("nwg-shell").join("data"))
}
