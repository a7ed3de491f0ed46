//! TOML service configuration, parsing, and validation.
//!
//! Every section is optional; a missing file section takes its defaults. The
//! CLI applies `--bind`, `--port` and `--generator` on top of what is parsed here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::search_params::SearchLimits;
use crate::sieve::PrimeGenerator;

/// Top-level configuration: `[server]`, `[limits]` and `[search]` sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: SearchLimits,
    #[serde(default)]
    pub search: SearchConfig,
}

/// The `[server]` section: HTTP listener and request guards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

/// The `[search]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default)]
    pub generator: PrimeGenerator,
}

/// Parse and validate a configuration document.
pub fn parse_toml(content: &str) -> Result<ServiceConfig> {
    let config: ServiceConfig = toml::from_str(content).context("invalid service configuration")?;
    validate_config(&config)?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn parse_toml_file(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_toml(&content).with_context(|| format!("in config file {}", path.display()))
}

/// Load `path` if given, otherwise the built-in defaults.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(p) => parse_toml_file(p),
        None => Ok(ServiceConfig::default()),
    }
}

pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("server.port must be non-zero");
    }
    if config.server.request_timeout_secs == 0 {
        anyhow::bail!("server.request_timeout_secs must be greater than 0");
    }
    if config.server.body_limit_bytes == 0 {
        anyhow::bail!("server.body_limit_bytes must be greater than 0");
    }
    if config.limits.max_end < 2 {
        anyhow::bail!(
            "limits.max_end must be at least 2 (got {}); no search could succeed",
            config.limits.max_end
        );
    }
    Ok(())
}
