//! CLI argument definitions for the Holly binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Holly, the holiday bot. Answers questions about the holiday calendar.
#[derive(Parser, Debug)]
#[command(name = "holly", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// API server bind address.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// JSON holiday catalog to load instead of the built-in one.
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,

    /// Answer as if today were this date (YYYY-MM-DD).
    #[arg(long = "today")]
    pub today: Option<NaiveDate>,

    /// Chat on stdin/stdout instead of serving HTTP.
    #[arg(long = "console")]
    pub console: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HOLLY_CONFIG env var > ~/.holly/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HOLLY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Priority: --port flag > HOLLY_PORT env var > config file value > 3978.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("HOLLY_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        if config_port != 0 {
            return config_port;
        }
        3978
    }

    /// Priority: --host flag > HOLLY_HOST env var > config file value.
    pub fn resolve_host(&self, config_host: &str) -> String {
        self.host
            .clone()
            .or_else(|| std::env::var("HOLLY_HOST").ok())
            .unwrap_or_else(|| config_host.to_string())
    }

    /// Priority: --log-level flag > HOLLY_LOG_LEVEL env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .or_else(|| std::env::var("HOLLY_LOG_LEVEL").ok())
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Priority: --catalog flag > HOLLY_CATALOG env var > config file value.
    /// `None` means the built-in catalog.
    pub fn resolve_catalog_path(&self, config_path: Option<&str>) -> Option<PathBuf> {
        if let Some(ref p) = self.catalog {
            return Some(p.clone());
        }
        if let Ok(p) = std::env::var("HOLLY_CATALOG") {
            return Some(PathBuf::from(p));
        }
        config_path.map(PathBuf::from)
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".holly").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".holly").join("config.toml");
    }
    PathBuf::from("config.toml")
}
