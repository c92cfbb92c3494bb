//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which currently covers the local repository scan root.
//!
//! Configuration is stored at `~/.config/hubdeck/config.json`; token and
//! log data live under the platform data directory.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "hubdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Token store file name
const TOKENS_FILE: &str = "tokens.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Root directory scanned for local repositories. Defaults to the
    /// home directory; `HUBDECK_REPOS_ROOT` overrides either.
    pub repos_root: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
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

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for persisted app data (token store, file log).
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Path of the persisted token list.
    pub fn tokens_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(TOKENS_FILE))
    }

    /// Resolve the repository scan root: env var, then config, then home.
    pub fn scan_root(&self) -> PathBuf {
        if let Ok(root) = std::env::var("HUBDECK_REPOS_ROOT") {
            return PathBuf::from(root);
        }
        self.repos_root
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
