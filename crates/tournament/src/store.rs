//! Tournament snapshot storage
//!
//! A snapshot is the whole [`Tournament`] as pretty-printed JSON. The core
//! never touches the file system; this is the only place that does.

use std::path::{Path, PathBuf};

use swiss_core::Tournament;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;

/// Default snapshot location when neither the config nor the CLI name one
pub const DEFAULT_STATE_FILE: &str = "tournament.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize tournament: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0} already exists")]
    AlreadyExists(PathBuf),
}

/// Load a snapshot from a JSON file
pub fn load(path: &Path) -> Result<Tournament, StoreError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tournament: Tournament =
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), tournament = %tournament.id, "loaded snapshot");
    Ok(tournament)
}

/// Save a snapshot, replacing any previous one
pub fn save(path: &Path, tournament: &Tournament) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(tournament)?;
    std::fs::write(path, json).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), tournament = %tournament.id, "saved snapshot");
    Ok(())
}

/// Save a snapshot for a new event, refusing to overwrite an existing file
pub fn create(path: &Path, tournament: &Tournament) -> Result<(), StoreError> {
    if path.exists() {
        return Err(StoreError::AlreadyExists(path.to_path_buf()));
    }
    save(path, tournament)
}
