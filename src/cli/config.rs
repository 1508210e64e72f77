//! Configuration file
//!
//! ```json
//! {
//!   "config_url": "https://primary.example.com/domains.json",
//!   "cache_dir": "/var/lib/domain-switcher",
//!   "server": { "port": 8787 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::failover::{ProbeSettings, DEFAULT_PROBE_PATH, DEFAULT_PROBE_SCHEME};
use crate::http_server::{HttpServerConfig, DOMAINS_PATH};

/// Host spellings that reach this process when it binds `server.host`
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]", "0.0.0.0", "[::]"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitcherConfig {
    /// Absolute URL of the domain list document; also its cache key
    pub config_url: String,

    /// Pinned current domain; otherwise each session's Host header
    #[serde(default)]
    pub current_domain: Option<String>,

    #[serde(default = "default_probe_scheme")]
    pub probe_scheme: String,

    #[serde(default = "default_probe_path")]
    pub probe_path: String,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    #[serde(default = "default_config_fetch_timeout_ms")]
    pub config_fetch_timeout_ms: u64,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Cache generation; changing it starts from an empty cache
    #[serde(default = "default_cache_namespace")]
    pub cache_namespace: String,

    /// Warm the cache before serving
    #[serde(default = "default_refresh_on_start")]
    pub refresh_on_start: bool,

    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_probe_scheme() -> String {
    DEFAULT_PROBE_SCHEME.to_string()
}
fn default_probe_path() -> String {
    DEFAULT_PROBE_PATH.to_string()
}
fn default_probe_timeout_ms() -> u64 {
    3000
}
fn default_config_fetch_timeout_ms() -> u64 {
    10_000
}
fn default_cache_dir() -> String {
    "./cache".to_string()
}
fn default_cache_namespace() -> String {
    "domain-switcher-v1".to_string()
}
fn default_refresh_on_start() -> bool {
    true
}

impl SwitcherConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: SwitcherConfig = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        let url = Url::parse(&self.config_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "https" | "http") && url.has_host())
            .ok_or_else(|| {
                CliError::config_error(format!(
                    "config_url must be an absolute http(s) URL, got '{}'",
                    self.config_url
                ))
            })?;

        if self.is_own_domains_route(&url) {
            return Err(CliError::config_error(format!(
                "config_url '{}' points at this server's own {}",
                self.config_url, DOMAINS_PATH
            )));
        }

        if self.probe_scheme != "https" && self.probe_scheme != "http" {
            return Err(CliError::config_error(format!(
                "Invalid probe_scheme: '{}'. Use 'https' or 'http'.",
                self.probe_scheme
            )));
        }

        if !self.probe_path.starts_with('/') {
            return Err(CliError::config_error("probe_path must start with '/'"));
        }

        if self.probe_timeout_ms == 0 {
            return Err(CliError::config_error("probe_timeout_ms must be > 0"));
        }

        if self.config_fetch_timeout_ms == 0 {
            return Err(CliError::config_error("config_fetch_timeout_ms must be > 0"));
        }

        if self.cache_namespace.is_empty()
            || self.cache_namespace.contains(['/', '\\'])
            || self.cache_namespace == "."
            || self.cache_namespace == ".."
        {
            return Err(CliError::config_error(format!(
                "Invalid cache_namespace: '{}'",
                self.cache_namespace
            )));
        }

        if matches!(&self.current_domain, Some(d) if d.is_empty()) {
            return Err(CliError::config_error("current_domain must not be empty"));
        }

        Ok(())
    }

    /// True if `url` is this server's candidate list route
    fn is_own_domains_route(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        let local = host == self.server.host.to_ascii_lowercase()
            || LOOPBACK_HOSTS.contains(&host.as_str());

        local
            && url.port_or_known_default() == Some(self.server.port)
            && url.path() == DOMAINS_PATH
    }

    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            scheme: self.probe_scheme.clone(),
            path: self.probe_path.clone(),
            timeout: Duration::from_millis(self.probe_timeout_ms),
        }
    }

    pub fn config_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.config_fetch_timeout_ms)
    }

    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir)
    }
}
