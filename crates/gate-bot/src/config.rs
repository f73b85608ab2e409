//! Application configuration.
//!
//! Settings come from a TOML file; API credentials come from the
//! environment only, so they never land in a checked-in file.

use crate::error::{AppError, AppResult};
use gate_api::Credentials;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GATE_API_KEY";

/// Environment variable holding the API secret.
pub const API_SECRET_ENV: &str = "GATE_API_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Exchange REST host.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Leverage applied when an order does not specify one.
    #[serde(default = "default_leverage")]
    pub default_leverage: i32,
}

fn default_base_url() -> String {
    gate_api::DEFAULT_BASE_URL.to_string()
}

fn default_leverage() -> i32 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_leverage: default_leverage(),
        }
    }
}

impl AppConfig {
    /// Load from the given path, falling back to defaults when the
    /// file does not exist.
    pub fn load_or_default(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(%path, "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("failed to read config: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("failed to parse config: {e}")))
    }

    /// API credentials from the environment.
    pub fn credentials(&self) -> AppResult<Credentials> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| AppError::Config(format!("{API_KEY_ENV} not set")))?;
        let secret = std::env::var(API_SECRET_ENV)
            .map_err(|_| AppError::Config(format!("{API_SECRET_ENV} not set")))?;
        Ok(Credentials { key, secret })
    }
}
