//! Errors raised while building a catalog.

use std::path::PathBuf;
use thiserror::Error;

use crate::FactId;

/// Why a fact source could not be added to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fact data in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate fact id '{id}' in {origin}")]
    DuplicateId { id: FactId, origin: String },
}
