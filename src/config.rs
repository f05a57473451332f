//! Configuration management for cf-ddns.

use crate::auth::Credentials;
use crate::detector::DEFAULT_IP_SERVICE;
use crate::error::{DdnsError, Result};
use crate::providers::{RecordSettings, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API token (or environment variable name if prefixed with $).
    #[serde(default)]
    pub api_token: String,

    /// Account email, sent as `X-Auth-Email` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Domain whose A record is kept in sync (e.g., "vpn.example.com").
    #[serde(default)]
    pub domain: String,

    /// TTL sent with updates. 1 means automatic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Whether to proxy through Cloudflare.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,

    /// IP echo service, queried with `format=json`.
    #[serde(default = "default_ip_service")]
    pub ip_service: String,

    /// Provider API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for every HTTP request, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

fn default_ip_service() -> String {
    DEFAULT_IP_SERVICE.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Level filter; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,

    /// Also send log lines to the local syslog socket.
    #[serde(default = "default_true")]
    pub syslog: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            syslog: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            email: None,
            domain: String::new(),
            ttl: None,
            proxied: None,
            ip_service: default_ip_service(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
            log: LogConfig::default(),
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_token: Option<String>,
    pub email: Option<String>,
    pub domain: Option<String>,
    pub no_syslog: bool,
}

impl Config {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DdnsError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("cf-ddns").join("config.toml"))
    }

    /// Load configuration from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate example configuration.
    pub fn example() -> Self {
        Self {
            api_token: "$CLOUDFLARE_API_TOKEN".to_string(),
            domain: "vpn.example.com".to_string(),
            ttl: Some(1),
            proxied: Some(false),
            ..Self::default()
        }
    }

    /// Apply command-line values on top of the file.
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(token) = overrides.api_token {
            self.api_token = token;
        }
        if let Some(email) = overrides.email {
            self.email = Some(email);
        }
        if let Some(domain) = overrides.domain {
            self.domain = domain;
        }
        if overrides.no_syslog {
            self.log.syslog = false;
        }
        self
    }

    /// Check required values and ranges.
    pub fn validate(&self) -> Result<()> {
        if resolve_env(&self.api_token).trim().is_empty() {
            return Err(DdnsError::Config("API token is required".to_string()));
        }
        if self.domain.trim().is_empty() {
            return Err(DdnsError::Config("Domain is required".to_string()));
        }
        if let Some(email) = &self.email {
            if resolve_env(email).trim().is_empty() {
                return Err(DdnsError::Config("Email is set but empty".to_string()));
            }
        }
        if self.timeout_secs == 0 {
            return Err(DdnsError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(ttl) = self.ttl {
            if ttl != 1 && !(60..=86400).contains(&ttl) {
                return Err(DdnsError::Config(format!(
                    "ttl must be 1 (automatic) or between 60 and 86400, got {}",
                    ttl
                )));
            }
        }
        Ok(())
    }

    /// Credentials with `$VAR` references resolved.
    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(resolve_env(&self.api_token));
        match &self.email {
            Some(email) => credentials.with_email(resolve_env(email)),
            None => credentials,
        }
    }

    pub fn record_settings(&self) -> RecordSettings {
        RecordSettings {
            ttl: self.ttl,
            proxied: self.proxied,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve environment variable references (values starting with $).
pub(crate) fn resolve_env(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_else(|_| {
            tracing::warn!("Environment variable {} not set", var_name);
            String::new()
        })
    } else {
        value.to_string()
    }
}
