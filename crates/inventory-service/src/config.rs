//! Service configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Service configuration loaded from an optional JSON file and environment
/// variables. Environment variables win over file values.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service name reported by `/health` (default: "Inventory API").
    pub title: String,

    /// Address to listen on (default: "0.0.0.0:3000").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/inventory").
    pub data_dir: String,

    /// Age after which a lock row is considered stale and may be replaced.
    /// `None` keeps locks until they are released.
    pub lock_ttl_seconds: Option<u64>,

    /// Whether HTTP requests are traced.
    pub request_log: bool,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Shape of the optional `CONFIG_FILE`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    title: Option<String>,
    listen_addr: Option<String>,
    data_dir: Option<String>,
    lock_ttl_seconds: Option<u64>,
    request_log: Option<bool>,
    cors_origins: Option<Vec<String>>,
    max_body_bytes: Option<usize>,
    request_timeout_seconds: Option<u64>,
}

impl ServiceConfig {
    /// Load configuration from `CONFIG_FILE` (if set) and environment
    /// variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("CONFIG_FILE") {
            match load_config_file(&path) {
                Ok(file) => {
                    tracing::info!(path = %path, "Loaded configuration file");
                    config.apply_file(file);
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Ignoring unreadable configuration file");
                }
            }
        }

        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(ttl) = lookup("LOCK_TTL_SECONDS").and_then(|s| s.parse().ok()) {
            config.lock_ttl_seconds = Some(ttl);
        }
        if let Some(enabled) = lookup("REQUEST_LOG").and_then(|s| parse_flag(&s)) {
            config.request_log = enabled;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            config.cors_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Some(bytes) = lookup("MAX_BODY_BYTES").and_then(|s| s.parse().ok()) {
            config.max_body_bytes = bytes;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECONDS").and_then(|s| s.parse().ok()) {
            config.request_timeout_seconds = secs;
        }

        config
    }

    /// The lock TTL as a `Duration`.
    #[must_use]
    pub fn lock_ttl(&self) -> Option<Duration> {
        self.lock_ttl_seconds.map(Duration::from_secs)
    }

    fn apply_file(&mut self, file: FileConfig) {
        let FileConfig {
            title,
            listen_addr,
            data_dir,
            lock_ttl_seconds,
            request_log,
            cors_origins,
            max_body_bytes,
            request_timeout_seconds,
        } = file;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(addr) = listen_addr {
            self.listen_addr = addr;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if lock_ttl_seconds.is_some() {
            self.lock_ttl_seconds = lock_ttl_seconds;
        }
        if let Some(enabled) = request_log {
            self.request_log = enabled;
        }
        if let Some(origins) = cors_origins {
            self.cors_origins = origins;
        }
        if let Some(bytes) = max_body_bytes {
            self.max_body_bytes = bytes;
        }
        if let Some(secs) = request_timeout_seconds {
            self.request_timeout_seconds = secs;
        }
    }
}

/// Load a JSON configuration file.
fn load_config_file(path: &str) -> Result<FileConfig, std::io::Error> {
    let path = Path::new(path);
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            title: "Inventory API".into(),
            listen_addr: "0.0.0.0:3000".into(),
            data_dir: "/data/inventory".into(),
            lock_ttl_seconds: None,
            request_log: true,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024, // 1MB
            request_timeout_seconds: 30,
        }
    }
}
