//! Runtime settings from `cardops.toml`.
//!
//! Looked up at `--config PATH` or in the platform config directory:
//! - Linux: ~/.config/cardops/
//! - macOS: ~/Library/Application Support/br.cardops.cardops/
//! - Windows: %APPDATA%/cardops/cardops/config/

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use cardops_core::DEFAULT_TIMEOUT;

const APP_QUALIFIER: &str = "br";
const APP_ORG: &str = "cardops";
const APP_NAME: &str = "cardops";
const CONFIG_FILENAME: &str = "cardops.toml";

/// Overrides `[submit] endpoint`.
pub const ENDPOINT_ENV: &str = "CARDOPS_SUBMIT_ENDPOINT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub submit: SubmitSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitSettings {
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl SubmitSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: Option<PathBuf>,
}

/// Platform settings file, if the platform has a config directory.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl Settings {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse settings")
    }

    /// Load from `explicit` (which must exist) or from the platform file
    /// (defaults when absent), then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::read(path)?,
            None => match settings_path() {
                Some(path) if path.is_file() => Self::read(&path)?,
                Some(path) => {
                    tracing::debug!(path = %path.display(), "no settings file, using defaults");
                    Self::default()
                }
                None => {
                    tracing::warn!("could not determine settings path, using defaults");
                    Self::default()
                }
            },
        };
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        let settings =
            Self::parse(&text).with_context(|| format!("in {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|value| !value.trim().is_empty()) {
            self.submit.endpoint = Some(endpoint.trim().to_string());
        }
    }
}
