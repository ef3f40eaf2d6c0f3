//! Configuration management for the indicator site tools.
//!
//! Both tools share one optional configuration file at
//! `~/.indicator-site/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Command-line flags (applied by each binary)
//! 2. Environment variables (`INDICATOR_*` prefix)
//! 3. Explicit config file values
//! 4. Default values
//!
//! # Environment Variable Mapping
//!
//! - `INDICATOR_SITE_DIR` → launcher.site_dir
//! - `INDICATOR_SITE_PORT` → launcher.port
//! - `INDICATOR_SITE_BIND` → launcher.bind
//! - `INDICATOR_DATA_ROOT` → validator.data_root
//! - `INDICATOR_LOG_LEVEL` → observability.log_level
//! - `INDICATOR_LOG_FORMAT` → observability.log_format

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ResultExt};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".indicator-site"),
        |dirs| dirs.home_dir().join(".indicator-site"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Indicator groups every company is expected to have result files for.
pub const DEFAULT_INDICATOR_GROUPS: [&str; 19] = [
    "7.11", "7.12", "7.13", "7.14", //
    "7.21", "7.22", "7.23", "7.24", "7.25", //
    "7.31", "7.32", "7.33", //
    "7.41", "7.42", "7.43", "7.44", //
    "7.51", "7.52", "7.53",
];

// ============================================================================
// Launcher Configuration
// ============================================================================

/// Static site launcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Directory served over HTTP
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,

    /// Page opened in the browser, relative to `site_dir`
    #[serde(default = "default_entry_file")]
    pub entry_file: String,

    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address. Default: "0.0.0.0" (all interfaces)
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Open the entry page in the default browser once the server is up
    #[serde(default = "default_true")]
    pub open_browser: bool,

    /// Delay before opening the browser when an external server is used
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    /// Send permissive CORS headers
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            entry_file: default_entry_file(),
            port: default_port(),
            bind: default_bind(),
            open_browser: true,
            startup_delay_ms: default_startup_delay_ms(),
            cors: true,
        }
    }
}

impl LauncherConfig {
    /// Absolute-or-relative path of the entry file inside the site directory.
    pub fn entry_path(&self) -> PathBuf {
        self.site_dir.join(&self.entry_file)
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid bind address: {}", self.bind)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_site_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_entry_file() -> String {
    "index_fallback.html".into()
}

fn default_port() -> u16 {
    8080
}

fn default_bind() -> String {
    "0.0.0.0".into()
}

fn default_startup_delay_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Validator Configuration
// ============================================================================

/// Data validator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Root directory the relative paths below are resolved against
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// Company roster, relative to `data_root`
    #[serde(default = "default_roster_file")]
    pub roster_file: PathBuf,

    /// Directory holding per-company result files, relative to `data_root`
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Indicator groups to check for every company
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,

    /// What to do when several files match one (company, group) pattern:
    /// "reject" or "first_match"
    #[serde(default = "default_ambiguous_policy")]
    pub ambiguous_policy: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            roster_file: default_roster_file(),
            results_dir: default_results_dir(),
            groups: default_groups(),
            ambiguous_policy: default_ambiguous_policy(),
        }
    }
}

impl ValidatorConfig {
    /// Roster path resolved against the data root.
    pub fn roster_path(&self) -> PathBuf {
        self.data_root.join(&self.roster_file)
    }

    /// Results directory resolved against the data root.
    pub fn results_path(&self) -> PathBuf {
        self.data_root.join(&self.results_dir)
    }
}

fn default_data_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_roster_file() -> PathBuf {
    PathBuf::from("data/companies.json")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("data/calculation_results/companies")
}

fn default_groups() -> Vec<String> {
    DEFAULT_INDICATOR_GROUPS.iter().map(|g| g.to_string()).collect()
}

fn default_ambiguous_policy() -> String {
    "reject".into()
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Configuration shared by the launcher and the validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default)]
    pub validator: ValidatorConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ToolsConfig {
    /// Load configuration from the default location, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "config file {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .context(format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .context(format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration (explicit path or default location) and apply
    /// environment variable overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("INDICATOR_SITE_DIR") {
            self.launcher.site_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup("INDICATOR_SITE_PORT") {
            if let Ok(p) = port.trim().parse() {
                self.launcher.port = p;
            }
        }
        if let Some(bind) = lookup("INDICATOR_SITE_BIND") {
            self.launcher.bind = bind;
        }
        if let Some(root) = lookup("INDICATOR_DATA_ROOT") {
            self.validator.data_root = PathBuf::from(root);
        }
        if let Some(level) = lookup("INDICATOR_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("INDICATOR_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }
}
