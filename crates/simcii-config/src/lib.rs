//! Shared configuration for the SIMCII dashboard tools.
//!
//! A TOML file in the platform config directory, overlaid by
//! `SIMCII_`-prefixed environment variables, translated into
//! `simcii_core::DashboardConfig`. The CLI applies its own flag overrides
//! on top of the loaded [`Config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use simcii_core::DashboardConfig;
use simcii_core::config::{
    DEFAULT_CLOCK_INTERVAL, DEFAULT_DESCRIPTION_LIMIT, DEFAULT_INVENTORY_URL,
    DEFAULT_REFRESH_INTERVAL, DEFAULT_STATISTICS_URL,
};

/// Environment variable prefix, e.g. `SIMCII_REFRESH_INTERVAL_MS=2000`.
/// Keys are split on `__` only, so single underscores stay in the name.
pub const ENV_PREFIX: &str = "SIMCII_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Device inventory service base URL.
    #[serde(default = "default_inventory_url")]
    pub inventory_url: String,

    /// Zone statistics service base URL.
    #[serde(default = "default_statistics_url")]
    pub statistics_url: String,

    /// Device list and statistics poll period. `0` disables polling.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Clock tick period. `0` disables the clock.
    #[serde(default = "default_clock_interval_ms")]
    pub clock_interval_ms: u64,

    /// Soft limit shown by the description counter.
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,

    /// Per-request timeout. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_url: default_inventory_url(),
            statistics_url: default_statistics_url(),
            refresh_interval_ms: default_refresh_interval_ms(),
            clock_interval_ms: default_clock_interval_ms(),
            description_limit: default_description_limit(),
            timeout_secs: None,
        }
    }
}

fn default_inventory_url() -> String {
    DEFAULT_INVENTORY_URL.into()
}
fn default_statistics_url() -> String {
    DEFAULT_STATISTICS_URL.into()
}
fn default_refresh_interval_ms() -> u64 {
    duration_ms(DEFAULT_REFRESH_INTERVAL)
}
fn default_clock_interval_ms() -> u64 {
    duration_ms(DEFAULT_CLOCK_INTERVAL)
}
fn default_description_limit() -> usize {
    DEFAULT_DESCRIPTION_LIMIT
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "simcii", "simcii").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("simcii");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment. A missing file is not
/// an error: defaults and env vars still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Validate and build the runtime `DashboardConfig`.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        Ok(DashboardConfig {
            inventory_url: parse_service_url("inventory_url", &self.inventory_url)?,
            statistics_url: parse_service_url("statistics_url", &self.statistics_url)?,
            refresh_interval: Duration::from_millis(self.refresh_interval_ms),
            clock_interval: Duration::from_millis(self.clock_interval_ms),
            description_limit: self.description_limit,
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

fn parse_service_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected an http or https URL, got scheme '{other}'"),
        }),
    }
}
