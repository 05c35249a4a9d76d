//! Runtime configuration: defaults, then an optional YAML file, then environment overrides.
//!
//! ```yaml
//! bind_addr: 127.0.0.1:3000
//! store_path: data/artian.json
//! log_filter: artian=debug
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::data::store::DEFAULT_STORE_PATH;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "artian.yaml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_LOG_FILTER: &str = "artian=info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store_path: String,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            store_path: DEFAULT_STORE_PATH.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Read a YAML config file. A missing file yields the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Apply `ARTIAN_BIND`, `ARTIAN_STORE` and `ARTIAN_LOG` when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(bind) = get("ARTIAN_BIND") {
            self.bind_addr = bind;
        }
        if let Some(store) = get("ARTIAN_STORE") {
            self.store_path = store;
        }
        if let Some(filter) = get("ARTIAN_LOG") {
            self.log_filter = filter;
        }
        self
    }

    /// File named by `ARTIAN_CONFIG` (default `artian.yaml`), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var("ARTIAN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Ok(Self::from_file(path)?.with_env_overrides())
    }
}
