use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::client::ResolveOptions;

const APP_NAME: &str = "emos";
const CONFIG_FILE: &str = "config.json";

/// Global override for the backend base URL.
pub const BACKEND_OVERRIDE_VAR: &str = "EMOS_BACKEND_BASE_URL";

/// Delays of the simulated processing, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Wait before the local mock runs after the backend failed.
    pub fallback_delay_ms: u64,
    /// Wait before the progress indicator resets after a run.
    pub reset_delay_ms: u64,
    /// Wait before the chat answers.
    pub chat_reply_delay_ms: u64,
    /// Staged reveal of the generic panel's three results.
    pub reveal_delays_ms: [u64; 3],
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            fallback_delay_ms: 2000,
            reset_delay_ms: 1000,
            chat_reply_delay_ms: 1000,
            reveal_delays_ms: [2000, 600, 800],
        }
    }
}

impl Timings {
    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_delay_ms)
    }

    pub fn reveal_delays(&self) -> [Duration; 3] {
        self.reveal_delays_ms.map(Duration::from_millis)
    }

    /// Every delay zeroed, for scripted runs.
    pub fn instant() -> Self {
        Self {
            fallback_delay_ms: 0,
            reset_delay_ms: 0,
            chat_reply_delay_ms: 0,
            reveal_delays_ms: [0; 3],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Backend base URL. Skips probing when set.
    pub backend_url: Option<String>,
    /// Origin the shell is considered hosted at, e.g. `http://localhost:8080`.
    pub origin: Option<String>,
    pub timings: Timings,
    /// Information units selected at startup.
    pub active_databases: Vec<String>,
    pub active_generators: Vec<String>,
    pub active_predictors: Vec<String>,
    /// Seed for the local mocks. Random when unset.
    pub seed: Option<u64>,
}

impl ShellConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if file doesn't exist or fails to parse.
    pub fn load() -> Self {
        match get_config_path().and_then(|path| Self::try_load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Like [`load`](Self::load) but from an explicit file.
    pub fn load_from(path: &Path) -> Self {
        Self::try_load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load {}, using defaults: {:#}", path.display(), e);
            Self::default()
        })
    }

    pub fn try_load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the configuration to the user's config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// URL resolution inputs, with the global override read from the
    /// environment.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            explicit: self.backend_url.clone(),
            override_url: std::env::var(BACKEND_OVERRIDE_VAR).ok(),
            origin: self.origin.clone(),
        }
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig::try_load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.timings.fallback_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "backend_url": "http://lab:5001", "timings": { "reset_delay_ms": 10 } }"#,
        )
        .unwrap();

        let config = ShellConfig::load_from(&path);
        assert_eq!(config.backend_url.as_deref(), Some("http://lab:5001"));
        assert_eq!(config.timings.reset_delay_ms, 10);
        assert_eq!(config.timings.fallback_delay_ms, 2000);
        assert!(config.active_generators.is_empty());
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(ShellConfig::try_load_from(&path).is_err());
        assert_eq!(ShellConfig::load_from(&path), ShellConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ShellConfig {
            origin: Some("http://localhost:8080".into()),
            active_generators: vec!["mattergen".into()],
            seed: Some(7),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(ShellConfig::load_from(&path), config);
    }
}
