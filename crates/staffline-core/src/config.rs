use serde::{Deserialize, Serialize};

use crate::error::{Result, StafflineError};
use crate::session::DEFAULT_SESSION_MAX_AGE_DAYS;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_MIN_MATCH_SCORE: u32 = 50;
pub const DEFAULT_ENDING_SOON_DAYS: u32 = 30;

/// Client configuration loaded from `config.toml`.
///
/// Every field has a default, so an empty or missing file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the ATS API, including the `/api` path.
    pub api_base_url: String,
    /// Absolute session lifetime counted from login.
    pub session_max_age_days: u32,
    /// Minimum score requested from the matching endpoints.
    pub default_min_score: u32,
    /// Window used for "ending soon" assignment lists.
    pub ending_soon_days: u32,
    /// TCP connect timeout for API requests.
    pub connect_timeout_secs: u64,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_max_age_days: DEFAULT_SESSION_MAX_AGE_DAYS,
            default_min_score: DEFAULT_MIN_MATCH_SCORE,
            ending_soon_days: DEFAULT_ENDING_SOON_DAYS,
            connect_timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Rejects values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StafflineError::config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        if self.session_max_age_days == 0 {
            return Err(StafflineError::config(
                "session_max_age_days must be at least 1",
            ));
        }
        if self.default_min_score > 100 {
            return Err(StafflineError::config(
                "default_min_score must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "http://localhost:8000/api");
        assert_eq!(config.session_max_age_days, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig =
            toml::from_str("api_base_url = \"https://ats.example.com/api/\"").unwrap();
        assert_eq!(config.base_url(), "https://ats.example.com/api");
        assert_eq!(config.default_min_score, 50);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = ClientConfig {
            api_base_url: "localhost:8000".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(StafflineError::Config(_))));
    }
}
