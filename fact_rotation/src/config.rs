//! Configuration loaded from TOML.

use fact_catalog::FactCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::trigger::TriggerGate;

const APP_DIR: &str = "fact-rotation";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for a rotation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Directory of JSON fact files. The bundled facts are used when unset.
    pub facts_dir: Option<PathBuf>,

    /// State file holding the shown-fact list.
    pub state_file: Option<PathBuf>,

    /// Minimum gap between file-driven facts, in milliseconds.
    pub debounce_ms: u64,

    /// File extensions whose open/create events trigger a fact.
    pub watch_extensions: Vec<String>,

    /// Prefix of the notification line.
    pub notification_label: String,

    /// Print the detailed description with every fact.
    pub show_details: bool,

    /// Keep the current fact's detail view in this Markdown file.
    pub detail_file: Option<PathBuf>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            facts_dir: None,
            state_file: None,
            debounce_ms: 2000,
            watch_extensions: vec!["py".to_string()],
            notification_label: "Python Fun Fact".to_string(),
            show_details: false,
            detail_file: None,
        }
    }
}

impl RotationConfig {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit` if given, otherwise from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The configured state file, or the default state location.
    pub fn state_path(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(default_state_path)
    }

    /// A trigger gate using this config's debounce and extensions.
    pub fn trigger_gate(&self) -> TriggerGate {
        TriggerGate::new(self.debounce(), &self.watch_extensions)
    }

    /// Build the catalog this config points at.
    pub fn load_catalog(&self) -> FactCatalog {
        match &self.facts_dir {
            Some(dir) => FactCatalog::load_dir(dir).0,
            None => {
                let catalog = FactCatalog::builtin();
                info!(loaded = catalog.len(), "using bundled facts");
                catalog
            }
        }
    }
}

/// Directory holding `config.toml`: `dirs::config_dir()/fact-rotation/`.
///
/// Override with the `FACT_ROTATION_CONFIG_DIR` environment variable.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(override_dir) = std::env::var_os("FACT_ROTATION_CONFIG_DIR") {
        return Some(PathBuf::from(override_dir));
    }
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// Directory holding the shown-fact state.
///
/// Resolves to `dirs::state_dir()/fact-rotation/`, or the local data dir on
/// platforms without a state dir. Override with `FACT_ROTATION_STATE_DIR`.
pub fn state_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FACT_ROTATION_STATE_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR))
}

/// Default config file path (`config_dir()/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Default state file path (`state_dir()/state.json`).
pub fn default_state_path() -> PathBuf {
    state_dir().join("state.json")
}
