//! Configuration file loading for the command line.
//!
//! Settings come from an optional TOML file; anything the file leaves out
//! falls back to a default, and command-line flags override both.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use chess_core::FenRecord;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// `[perft]` section.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PerftConfig {
    /// Depth used when `--depth` is not given. Defaults to 4.
    #[serde(default = "default_perft_depth")]
    pub depth: u32,
}

fn default_perft_depth() -> u32 {
    4
}

impl Default for PerftConfig {
    fn default() -> Self {
        PerftConfig {
            depth: default_perft_depth(),
        }
    }
}

/// `[search]` section.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Depth used when `--depth` is not given. Defaults to 3.
    #[serde(default = "default_search_depth")]
    pub depth: u32,
}

fn default_search_depth() -> u32 {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: default_search_depth(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Position used when `--fen` is not given.
    #[serde(default = "default_start_fen")]
    pub start_fen: String,
    #[serde(default)]
    pub perft: PerftConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_start_fen() -> String {
    FenRecord::STARTPOS.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            start_fen: default_start_fen(),
            perft: PerftConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from `path`.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}
