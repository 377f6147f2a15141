//! Unified path management for staffline configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/staffline/         # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! └── session.json             # Durable scope: remembered session
//! ```
//!
//! `STAFFLINE_CONFIG_DIR` (or `--config-dir`) replaces the whole directory.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "STAFFLINE_CONFIG_DIR";

const APP_DIR_NAME: &str = "staffline";
const CONFIG_FILE_NAME: &str = "config.toml";
const SESSION_FILE_NAME: &str = "session.json";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolved locations of staffline's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StafflinePaths {
    config_dir: PathBuf,
}

impl StafflinePaths {
    /// Resolves the config directory.
    ///
    /// Precedence: `override_dir`, then `STAFFLINE_CONFIG_DIR`, then the
    /// platform config dir joined with `staffline`.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, PathError> {
        if let Some(dir) = override_dir {
            return Ok(Self::at(dir));
        }
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::at(PathBuf::from(dir)));
        }
        let base = dirs::config_dir().ok_or(PathError::ConfigDirNotFound)?;
        Ok(Self::at(base.join(APP_DIR_NAME)))
    }

    /// Uses `dir` as the config directory as-is.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Path to the durable scope file.
    pub fn session_file(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE_NAME)
    }
}
