//! Application configuration management.
//!
//! This module handles loading and saving the configuration, which covers
//! the two service base URLs and an optional data-directory override.
//!
//! Configuration is stored at `~/.config/shrinesync/config.json`; the
//! `SHRINE_API_URL`, `SHRINE_GALLERY_URL` and `SHRINE_DATA_DIR` environment
//! variables override the file.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "shrinesync";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default base URL of the shrine API during local development
const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    /// Base URL of the gallery collaborator service. Defaults to the main
    /// API host, which proxies it in most deployments.
    pub gallery_base_url: String,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            gallery_base_url: DEFAULT_API_BASE.to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SHRINE_API_URL") {
            self.api_base_url = url;
        }
        if let Ok(url) = std::env::var("SHRINE_GALLERY_URL") {
            self.gallery_base_url = url;
        }
        if let Ok(dir) = std::env::var("SHRINE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the local snapshots and the checkout session.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
