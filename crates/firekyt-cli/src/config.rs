//! CLI configuration management.
//!
//! Persists the API URL and session token to `~/.firekyt/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persistent CLI configuration.
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Publishing API URL saved at login (e.g., "<https://app.firekyt.com>").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Session bearer token issued by the FireKyt auth service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("api_url", &self.api_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "****"))
            .finish()
    }
}

impl CliConfig {
    /// Path to the config directory: `~/.firekyt/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".firekyt"))
    }

    /// Path to the config file: `~/.firekyt/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk. Returns default if file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path =
            Self::config_path().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clear the stored session token.
    pub fn clear_auth(&mut self) {
        self.access_token = None;
    }

    pub const fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }
}
