use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils;

pub const DEFAULT_BASE_URL: &str = "https://api.phish.net/v5";
pub const DEFAULT_ARTIST: &str = "Phish";

const ENV_API_KEY: &str = "PHISHNET_API_KEY";
const ENV_BASE_URL: &str = "PHISHNET_BASE_URL";
const ENV_ARTIST: &str = "PHISHNET_ARTIST";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub artist: Option<String>,
}

impl AppConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn artist(&self) -> &str {
        self.artist
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_ARTIST)
    }

    /// Values from `overrides` replace ours wherever they are set.
    pub fn merge(mut self, overrides: AppConfig) -> Self {
        if overrides.api_key.is_some() {
            self.api_key = overrides.api_key;
        }
        if overrides.base_url.is_some() {
            self.base_url = overrides.base_url;
        }
        if overrides.artist.is_some() {
            self.artist = overrides.artist;
        }
        self
    }

    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(ENV_API_KEY).ok(),
            base_url: std::env::var(ENV_BASE_URL).ok(),
            artist: std::env::var(ENV_ARTIST).ok(),
        }
    }
}

/// Read-only view of the config file merged with the environment.
pub struct ConfigStore {
    data: AppConfig,
}

impl ConfigStore {
    pub fn load() -> Self {
        let path = utils::config_path();
        let file = match read_config(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!("ignoring unreadable config {:?}: {err}", path);
                AppConfig::default()
            }
        };
        debug!("loaded config from {:?}", path);
        Self {
            data: file.merge(AppConfig::from_env()),
        }
    }

    pub fn read(&self) -> AppConfig {
        self.data.clone()
    }
}

fn read_config(path: &Path) -> Result<AppConfig, String> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}
