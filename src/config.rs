//! # Configuration Management
//!
//! This module handles loading configuration from `weather-config.toml`. It covers
//! the forecast location and timezone, the provider endpoint and key, the HTTP port
//! and where icons live.
//!
//! Two environment variables override the file:
//! - `TOMORROW_API_KEY` replaces `provider.api_key`
//! - `PORT` replaces `server.port`

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::forecast_data::Location;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "weather-config.toml";

const API_KEY_VAR: &str = "TOMORROW_API_KEY";
const PORT_VAR: &str = "PORT";

/// Application configuration loaded from weather-config.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where the forecast is for
    pub location: LocationConfig,
    /// Forecast provider settings
    pub provider: ProviderConfig,
    /// HTTP listener
    pub server: ServerConfig,
    /// Static asset locations
    pub assets: AssetsConfig,
}

/// Forecast location and the timezone used for every date on the dashboard
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone name, e.g. "Europe/London"
    pub timezone: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// tomorrow.io API root, without the `/v4/...` path
    pub base_url: String,
    /// Usually left empty in the file and supplied via TOMORROW_API_KEY
    pub api_key: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory of condition icons (PNG)
    pub icons_dir: PathBuf,
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            latitude: 51.50717853040887,
            longitude: -0.24805243109767183,
            timezone: "Europe/London".to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://api.tomorrow.io".to_string(),
            api_key: String::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: 8080 }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            icons_dir: PathBuf::from("icons"),
        }
    }
}

impl Config {
    /// Load configuration from weather-config.toml, then apply environment overrides
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path, then apply environment overrides.
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let mut config = Self::read_file(path.as_ref());
        config.apply_overrides(|name| env::var(name).ok());
        config
    }

    fn read_file(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        timezone = %config.location.timezone,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config file format, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "No config file found, using default configuration (west London)");
                Self::default()
            }
        }
    }

    /// Apply `TOMORROW_API_KEY` and `PORT` as returned by `lookup`.
    ///
    /// A `PORT` that does not parse is ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_VAR).filter(|k| !k.is_empty()) {
            self.provider.api_key = key;
        }
        if let Some(port) = lookup(PORT_VAR) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!(value = %port, error = %e, "Ignoring invalid PORT"),
            }
        }
    }

    /// Configured timezone, or Europe/London if the name is not recognised
    pub fn timezone(&self) -> Tz {
        self.location.timezone.parse().unwrap_or_else(|e| {
            warn!(timezone = %self.location.timezone, error = %e, "Unknown timezone, using Europe/London");
            chrono_tz::Europe::London
        })
    }

    pub fn location(&self) -> Location {
        Location {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
        }
    }

    /// Save current configuration to weather-config.toml
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(DEFAULT_CONFIG_PATH)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "Configuration saved");
        Ok(())
    }
}
