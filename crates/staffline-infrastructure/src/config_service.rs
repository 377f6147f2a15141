//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `config.toml` and layers the overrides on top:
//!
//! 1. built-in defaults
//! 2. `config.toml` (missing file means defaults)
//! 3. `STAFFLINE_API_URL`
//! 4. explicit overrides (command-line flags)

use crate::paths::StafflinePaths;
use staffline_core::config::ClientConfig;
use staffline_core::{Result, StafflineError};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "STAFFLINE_API_URL";

/// Values that take precedence over the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
}

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    overrides: ConfigOverrides,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &StafflinePaths, overrides: ConfigOverrides) -> Self {
        Self {
            path: paths.config_file(),
            overrides,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A malformed file or an invalid merged value is an error; the client
    /// does not silently fall back to defaults in that case.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_file()?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                loaded.api_base_url = url.trim().to_string();
            }
        }
        self.apply_overrides(&mut loaded);
        loaded.validate()?;

        tracing::debug!(
            "Loaded config from {} (api_base_url={})",
            self.path.display(),
            loaded.api_base_url
        );

        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_file(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            return Ok(ClientConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            StafflineError::config(format!("{}: {}", self.path.display(), e))
        })
    }

    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(url) = self.overrides.api_base_url.as_deref() {
            config.api_base_url = url.trim().to_string();
        }
    }
}
