//! Application configuration.
//!
//! Loaded from a TOML file; every section and field has a default so a
//! missing file yields a runnable development configuration (with auth
//! disabled, since there is no secret to sign with).

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use recipes_auth::AuthConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.request_timeout.is_zero() {
            return Err("server.request_timeout must be > 0".into());
        }
        if self.cache.ttl.is_zero() {
            return Err("cache.ttl must be > 0".into());
        }
        if self.storage.op_timeout.is_zero() {
            return Err("storage.op_timeout must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.auth.enabled {
            self.auth
                .validate()
                .map_err(|e| format!("auth config error: {e}"))?;
        }
        Ok(())
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on handling a single request.
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> Duration {
    Duration::from_secs(15)
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Recipe list cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Backstop TTL for cached entries. Explicit invalidation on writes
    /// is the primary freshness mechanism.
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub ttl: Duration,
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(3600)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: default_cache_ttl(),
        }
    }
}

/// Document store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Upper bound on a single store call.
    #[serde(default = "default_op_timeout", with = "humantime_serde")]
    pub op_timeout: Duration,
}

fn default_op_timeout() -> Duration {
    Duration::from_secs(5)
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            op_timeout: default_op_timeout(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Loads configuration from a TOML file.
///
/// A missing file is not an error; defaults are returned (with auth
/// disabled since no secret can be defaulted).
///
/// # Errors
///
/// Returns a message if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
    let cfg = match path {
        Some(p) if Path::new(p).exists() => {
            let raw = std::fs::read_to_string(p)
                .map_err(|e| format!("failed to read config file {p}: {e}"))?;
            toml::from_str(&raw).map_err(|e| format!("failed to parse config file {p}: {e}"))?
        }
        _ => {
            let mut cfg = AppConfig::default();
            cfg.auth.enabled = false;
            cfg
        }
    };
    cfg.validate()?;
    Ok(cfg)
}
