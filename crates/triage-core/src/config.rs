//! Configuration for the classifier endpoint, temporal parsing, and cue storage.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the classifier base URL.
const ENV_CLASSIFIER_URL: &str = "TRIAGE_CLASSIFIER_URL";

/// Complete triage configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Remote classifier endpoint configuration.
    pub classifier: ClassifierConfig,
    /// Temporal parser selection.
    pub temporal: TemporalConfig,
    /// Cue store location.
    pub store: StoreConfig,
}

/// Remote classifier endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL of the classification server.
    pub base_url: String,
    /// Hard wall-clock timeout for one classification request, in milliseconds.
    pub timeout_ms: u64,
    /// Whether the remote path is attempted at all.
    pub enabled: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_owned(),
            timeout_ms: 15_000,
            enabled: true,
        }
    }
}

/// Temporal parser selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Use the full date-expression parser; when `false` only the
    /// minimal keyword fallback is used.
    pub full_parser: bool,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self { full_parser: true }
    }
}

/// Cue store location.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the cue store file; `None` uses the default location
    /// under the user config directory.
    pub cues_path: Option<PathBuf>,
}

impl TriageConfig {
    /// Get the default config directory path (`~/.triage`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        use dirs::home_dir;
        let home = home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".triage"))
    }

    /// Get the default config file path (`~/.triage/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the default cue store path, honoring the configured override.
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn cues_path(&self) -> Result<PathBuf> {
        match &self.store.cues_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("cues.json")),
        }
    }

    /// Load config from the default location (`~/.triage/config.toml`)
    /// If the config doesn't exist, creates it with default values.
    ///
    /// The `TRIAGE_CLASSIFIER_URL` environment variable overrides the
    /// classifier base URL regardless of the file contents.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            config
        };

        if let Ok(url) = env::var(ENV_CLASSIFIER_URL) {
            config.classifier.base_url = url;
        }

        Ok(config)
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        use toml::from_str;
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read config: {error}")))?;
        from_str(&contents)
            .map_err(|error| Error::Config(format!("Failed to parse config: {error}")))
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        use toml::to_string_pretty;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Triage Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| Error::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }
}
