//! Client configuration.
//!
//! Read from ~/.config/evently/config.toml, with `EVENTLY_*` environment
//! variables taking precedence (e.g. `EVENTLY_API_URL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EventlyError, EventlyResult};

static DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventlyConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the session token is kept. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl Default for EventlyConfig {
    fn default() -> Self {
        EventlyConfig {
            api_url: default_api_url(),
            token_path: None,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl EventlyConfig {
    pub fn config_path() -> EventlyResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventlyError::Config("Could not determine config directory".into()))?
            .join("evently");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, creating a commented default file on first run.
    pub fn load() -> EventlyResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path, true)
    }

    /// Load from a specific file, optionally layering environment overrides.
    pub fn load_from(path: &Path, with_env: bool) -> EventlyResult<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if with_env {
            builder = builder.add_source(Environment::with_prefix("EVENTLY"));
        }

        builder
            .build()
            .map_err(|e| EventlyError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventlyError::Config(e.to_string()))
    }

    /// Resolved token file location, with `~` expanded.
    pub fn token_path(&self) -> EventlyResult<PathBuf> {
        match &self.token_path {
            Some(path) => Ok(PathBuf::from(
                shellexpand::tilde(&path.to_string_lossy()).into_owned(),
            )),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| EventlyError::Config("Could not determine data directory".into()))?
                .join("evently")
                .join("token")),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Save the current config.
    pub fn save(&self, path: &Path) -> EventlyResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| EventlyError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| EventlyError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventlyResult<()> {
        let contents = format!(
            "\
# evently configuration

# Backend base URL:
# api_url = \"{}\"

# Where the session token is stored:
# token_path = \"~/.local/share/evently/token\"

# Quiet period before a search query is sent, in milliseconds:
# search_debounce_ms = {}
",
            DEFAULT_API_URL, DEFAULT_SEARCH_DEBOUNCE_MS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventlyError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventlyError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
