//! Configuration for the API client.
//!
//! Values are resolved in this order (later wins):
//! 1. Built-in defaults
//! 2. The YAML config file at `$LOLP_CONFIG_PATH`, or `lolp/config.yaml`
//!    under the platform config directory
//! 3. `LOLP_ENDPOINT`, `LOLP_TLS_NOVERIFY` and `LOLP_TOKEN`
//!
//! # Example
//!
//! ```yaml
//! endpoint: https://api.mc.lolipop.jp/
//! tlsNoVerify: false
//! token: abcdef0123456789
//! timeoutSecs: 30
//! ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::constants::{
    CONFIG_FILE, CONFIG_PATH_ENV_VAR, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, ENDPOINT_ENV_VAR,
    TLS_NO_VERIFY_ENV_VAR, TOKEN_ENV_VAR,
};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Skip TLS certificate verification. Only for self-signed test environments.
    #[serde(default)]
    pub tls_no_verify: bool,
    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            tls_no_verify: false,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides looked up through `lookup`. Empty values count as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(endpoint) = get(ENDPOINT_ENV_VAR) {
            self.endpoint = endpoint;
        }
        if get(TLS_NO_VERIFY_ENV_VAR).is_some() {
            self.tls_no_verify = true;
        }
        if let Some(token) = get(TOKEN_ENV_VAR) {
            self.token = Some(token);
        }
    }
}

pub fn config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push(CONFIG_FILE);
            p
        })
}

/// Load the config file and apply environment overrides.
pub fn load_config() -> anyhow::Result<Config> {
    let mut cfg = load_config_file(&config_path())?;
    cfg.apply_env();
    Ok(cfg)
}

/// Load only the config file. A missing file yields the defaults.
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    if cfg.timeout_secs == 0 {
        bail!("invalid config {}: timeoutSecs must be greater than 0", path.display());
    }
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }
    let data = serde_yaml::to_string(cfg)?;
    fs::write(path, data).with_context(|| format!("writing config {}", path.display()))?;
    Ok(())
}
