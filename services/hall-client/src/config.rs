//! Configuration types for the hall client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub waiting: WaitingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

/// Where the Hall gateway lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Waiting room settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingConfig {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_ms: u64,
}

impl Default for WaitingConfig {
    fn default() -> Self {
        Self {
            domain: None,
            polling_interval_ms: default_polling_interval(),
        }
    }
}

impl WaitingConfig {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }
}

/// Admin credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: None,
            password_env: default_password_env(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_polling_interval() -> u64 {
    3000
}

fn default_password_env() -> String {
    "HALL_ADMIN_PASSWORD".to_string()
}

impl Config {
    /// Fill secrets left out of the file from the environment
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        if self.admin.password.is_none() && !self.admin.password_env.is_empty() {
            if let Ok(password) = std::env::var(&self.admin.password_env) {
                tracing::debug!(
                    "Admin password taken from environment variable {}",
                    self.admin.password_env
                );
                self.admin.password = Some(password);
            }
        }
        Ok(())
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        let base_url = self.gateway.base_url.trim();
        if base_url.is_empty() {
            return Err(crate::HallError::Config(
                "gateway.base_url must not be empty".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(crate::HallError::Config(format!(
                "gateway.base_url must be an http(s) URL, got {:?}",
                base_url
            )));
        }
        if self.gateway.request_timeout_seconds == 0 {
            return Err(crate::HallError::Config(
                "gateway.request_timeout_seconds must be positive".to_string(),
            ));
        }
        if self.waiting.polling_interval_ms == 0 {
            return Err(crate::HallError::Config(
                "waiting.polling_interval_ms must be positive".to_string(),
            ));
        }
        if let Some(domain) = &self.waiting.domain {
            if domain.trim().is_empty() {
                return Err(crate::HallError::Config(
                    "waiting.domain must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::HallError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content).map_err(|e| {
        crate::HallError::Config(format!("Failed to parse config file {:?}: {}", path, e))
    })?;
    Ok(config)
}
