//! Event configuration (`tournament.toml`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use swiss_core::{recommended_rounds, Participant, Tournament, TournamentError};
use thiserror::Error;

use crate::store::DEFAULT_STATE_FILE;

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

/// Event setup as written in `tournament.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Tournament id; derived from the name when absent
    pub id: Option<String>,
    pub name: String,
    /// Rounds to play; `ceil(log2(players))` when absent
    pub rounds: Option<u32>,
    /// Display names, registered in this order
    pub players: Vec<String>,
    /// Where the snapshot is stored
    pub state_file: PathBuf,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            id: None,
            name: "Swiss Tournament".to_string(),
            rounds: None,
            players: Vec::new(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl EventConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn total_rounds(&self) -> u32 {
        self.rounds
            .unwrap_or_else(|| recommended_rounds(self.players.len()))
    }

    pub fn tournament_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| slug(&self.name))
    }

    /// Register the configured players and create the tournament in setup.
    ///
    /// Players get ids `p1`, `p2`, … in configuration order.
    pub fn build_tournament(&self) -> Result<Tournament, ConfigError> {
        let participants = self
            .players
            .iter()
            .enumerate()
            .map(|(i, name)| Participant::new(format!("p{}", i + 1), name.trim()))
            .collect();
        Ok(Tournament::new(
            self.tournament_id(),
            self.name.clone(),
            self.total_rounds(),
            participants,
        )?)
    }
}

/// Lowercase ASCII letters and digits, everything else collapsed to `-`
fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("tournament");
    }
    slug
}
