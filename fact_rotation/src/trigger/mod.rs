//! Triggers - the host events that ask for a fact, and the gate that
//! rate-limits them before they reach the rotation.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Default minimum gap between two file-driven facts.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// An event requesting a fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit user request. Never debounced.
    Manual,

    /// A file was opened in the editor.
    FileOpened { path: PathBuf },

    /// One or more files were created.
    FilesCreated { paths: Vec<PathBuf> },
}

/// Errors from parsing a trigger line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerParseError {
    #[error("empty trigger line")]
    Empty,

    #[error("unknown trigger '{0}', expected show, open or create")]
    UnknownKind(String),

    #[error("'{0}' needs at least one path")]
    MissingPath(String),
}

impl FromStr for Trigger {
    type Err = TriggerParseError;

    /// Parse `show`, `open PATH` or `create PATH...`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let kind = words.next().ok_or(TriggerParseError::Empty)?;
        let paths: Vec<PathBuf> = words.map(PathBuf::from).collect();

        match kind {
            "show" => Ok(Trigger::Manual),
            "open" => paths
                .into_iter()
                .next()
                .map(|path| Trigger::FileOpened { path })
                .ok_or_else(|| TriggerParseError::MissingPath(kind.to_string())),
            "create" if paths.is_empty() => Err(TriggerParseError::MissingPath(kind.to_string())),
            "create" => Ok(Trigger::FilesCreated { paths }),
            other => Err(TriggerParseError::UnknownKind(other.to_string())),
        }
    }
}

/// Decides which triggers reach the rotation.
///
/// Manual triggers always pass and do not touch the debounce clock. File
/// triggers pass when a path has a watched extension and strictly more than
/// the debounce interval has elapsed since the last admitted file trigger.
#[derive(Debug, Clone)]
pub struct TriggerGate {
    debounce: Duration,
    extensions: Vec<String>,
    last_fired: Option<Instant>,
}

impl Default for TriggerGate {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE, ["py"])
    }
}

impl TriggerGate {
    /// Create a gate watching files with the given extensions (leading dots
    /// optional, matched case-insensitively).
    pub fn new<I, E>(debounce: Duration, extensions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        Self {
            debounce,
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            last_fired: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Check whether `path` has a watched extension.
    pub fn watches(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .map(|ext| self.extensions.iter().any(|watched| *watched == ext))
            .unwrap_or(false)
    }

    /// Decide whether `trigger`, arriving at `now`, should produce a fact.
    pub fn admit(&mut self, trigger: &Trigger, now: Instant) -> bool {
        let relevant = match trigger {
            Trigger::Manual => return true,
            Trigger::FileOpened { path } => self.watches(path),
            Trigger::FilesCreated { paths } => paths.iter().any(|p| self.watches(p)),
        };

        if !relevant {
            debug!(?trigger, "ignoring trigger for unwatched files");
            return false;
        }

        if let Some(last) = self.last_fired {
            if now.saturating_duration_since(last) <= self.debounce {
                debug!(?trigger, "debounced trigger");
                return false;
            }
        }

        self.last_fired = Some(now);
        true
    }
}
