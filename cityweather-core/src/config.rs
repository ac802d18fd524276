use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

use crate::{error::WeatherError, extract::ResponseParser};

pub const DEFAULT_KEY_FILE: &str = "apikey.txt";
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// key_file = "/home/me/.openweather-key"
/// base_url = "http://api.openweathermap.org"
/// timeout_secs = 5
/// parser = "scan"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File whose first line is the OpenWeather API key.
    pub key_file: PathBuf,
    pub base_url: String,
    pub timeout_secs: u64,
    pub parser: ResponseParser,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            parser: ResponseParser::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if cfg.timeout_secs == 0 {
            return Err(anyhow!(
                "Invalid config file {}: timeout_secs must be greater than zero",
                path.display()
            ));
        }

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reads the API key from [`Config::key_file`].
    pub fn api_key(&self) -> Result<String, WeatherError> {
        load_api_key(&self.key_file)
    }
}

/// Returns the first line of `path`, trimmed.
///
/// A missing file or an empty first line is a startup error.
pub fn load_api_key(path: &Path) -> Result<String, WeatherError> {
    let contents = fs::read_to_string(path).map_err(|source| WeatherError::MissingCredentials {
        path: path.to_path_buf(),
        source,
    })?;

    let key = contents.lines().next().unwrap_or_default().trim();
    if key.is_empty() {
        return Err(WeatherError::EmptyCredentials { path: path.to_path_buf() });
    }

    Ok(key.to_string())
}

/// Writes `api_key` as the only line of `path`, creating parent directories.
pub fn save_api_key(path: &Path, api_key: &str) -> Result<()> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key cannot be empty"));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, format!("{api_key}\n"))
        .with_context(|| format!("Failed to write API key file: {}", path.display()))?;

    Ok(())
}
