//! Loading facts from JSON files on disk.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::FactCatalog;
use crate::{CatalogError, Fact};

/// Outcome of a load: how many facts made it in and what was skipped.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failures: Vec<CatalogError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl FactCatalog {
    /// Load every `*.json` file in `dir`.
    ///
    /// Files are read in file-name order so the catalog order is stable across
    /// platforms. A file may hold a single fact or an array of facts. Bad files
    /// and bad records are logged, reported and skipped; an unreadable directory
    /// gives an empty catalog.
    pub fn load_dir(dir: impl AsRef<Path>) -> (Self, LoadReport) {
        let dir = dir.as_ref();
        let mut catalog = Self::new();
        let mut report = LoadReport::default();

        let files = match json_files(dir) {
            Ok(files) => files,
            Err(source) => {
                let err = CatalogError::Io {
                    path: dir.to_path_buf(),
                    source,
                };
                warn!(error = %err, "fact directory unavailable, catalog is empty");
                report.failures.push(err);
                return (catalog, report);
            }
        };

        for path in files {
            let origin = path.display().to_string();
            match fs::read_to_string(&path) {
                Ok(content) => catalog.absorb(&origin, &content, &mut report),
                Err(source) => {
                    let err = CatalogError::Io { path, source };
                    warn!(error = %err, "skipping fact file");
                    report.failures.push(err);
                }
            }
        }

        info!(
            loaded = report.loaded,
            skipped = report.failures.len(),
            dir = %dir.display(),
            "loaded facts"
        );
        (catalog, report)
    }

    /// Parse one JSON document and add each well-formed fact in it.
    pub(super) fn absorb(&mut self, origin: &str, content: &str, report: &mut LoadReport) {
        let records = match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(items)) => items,
            Ok(single) => vec![single],
            Err(source) => {
                let err = CatalogError::Parse {
                    origin: origin.to_string(),
                    source,
                };
                warn!(error = %err, "skipping fact source");
                report.failures.push(err);
                return;
            }
        };

        for record in records {
            let added = serde_json::from_value::<Fact>(record)
                .map_err(|source| CatalogError::Parse {
                    origin: origin.to_string(),
                    source,
                })
                .and_then(|fact| self.insert(fact, origin));

            match added {
                Ok(()) => report.loaded += 1,
                Err(err) => {
                    warn!(error = %err, "skipping fact record");
                    report.failures.push(err);
                }
            }
        }
        debug!(origin, total = self.len(), "absorbed fact source");
    }
}

/// Sorted paths of the `.json` files directly inside `dir`.
fn json_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path()));
    Ok(json_paths(entries))
}

/// Keep the `.json` files among listed entries, sorted. Entries that could not
/// be listed are logged and skipped.
fn json_paths(entries: impl IntoIterator<Item = std::io::Result<PathBuf>>) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort();
    files
}
