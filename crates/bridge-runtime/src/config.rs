//! # Bridge Configuration
//!
//! Aggregate configuration for the runtime and both subsystems.
//!
//! ## Load Order
//!
//! 1. Built-in defaults
//! 2. TOML file named by `VB_CONFIG` (optional)
//! 3. `VB_*` environment overrides
//!
//! The result is validated before anything is wired.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vb_01_ledger_sync::{RpcLedgerConfig, SyncConfig};
use vb_02_wallet_auth::ChallengeConfig;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "VB_CONFIG";

/// Default HTTP listen port.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// HTTP listener.
    pub http: HttpConfig,
    /// Ledger endpoint. No `rpc_url` selects the in-memory ledger.
    pub ledger: RpcLedgerConfig,
    /// Reconciliation scheduler.
    pub sync: SyncConfig,
    /// Wallet challenges.
    pub challenge: ChallengeConfig,
    /// Local cache storage.
    pub storage: StorageConfig,
    /// Cross-origin policy for the HTTP controllers.
    pub cors: CorsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Local cache storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the persistent cache. `None` keeps the cache in memory.
    pub data_dir: Option<PathBuf>,
    /// fsync every cache write.
    pub sync_writes: bool,
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 86400,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `BridgeConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },

    /// The merged configuration is unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl BridgeConfig {
    /// Create a config for testing (ephemeral port, short intervals).
    pub fn for_testing() -> Self {
        Self {
            http: HttpConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 0,
            },
            sync: SyncConfig::for_testing(),
            challenge: ChallengeConfig::for_testing(),
            ..Self::default()
        }
    }

    /// Defaults, then `VB_CONFIG`, then environment overrides; validated.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. Missing sections keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `VB_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_env(&lookup, "VB_HTTP_PORT")? {
            self.http.port = port;
        }
        if let Some(url) = lookup("VB_LEDGER_RPC_URL") {
            self.ledger.rpc_url = Some(url);
        }
        if let Some(address) = lookup("VB_CONTRACT_ADDRESS") {
            self.ledger.contract_address = address;
        }
        if let Some(sender) = lookup("VB_LEDGER_SENDER") {
            self.ledger.sender = Some(sender);
        }
        if let Some(secs) = parse_env(&lookup, "VB_SYNC_INTERVAL_SECS")? {
            self.sync.interval_secs = secs;
        }
        if let Some(secs) = parse_env(&lookup, "VB_CHALLENGE_TTL_SECS")? {
            self.challenge.ttl_secs = secs;
        }
        if let Some(max) = parse_env(&lookup, "VB_MAX_FAILED_ATTEMPTS")? {
            self.challenge.max_failed_attempts = max;
        }
        if let Some(dir) = lookup("VB_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Reject settings the runtime cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.interval_secs == 0 {
            return Err(ConfigError::Invalid("sync.interval_secs cannot be 0".into()));
        }
        if self.challenge.ttl_secs == 0 {
            return Err(ConfigError::Invalid("challenge.ttl_secs cannot be 0".into()));
        }
        if self.challenge.max_failed_attempts == 0 {
            return Err(ConfigError::Invalid(
                "challenge.max_failed_attempts cannot be 0".into(),
            ));
        }
        if self.challenge.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "challenge.sweep_interval_secs cannot be 0".into(),
            ));
        }
        if self.ledger.rpc_url.is_some() && self.ledger.contract_address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ledger.contract_address is required with ledger.rpc_url".into(),
            ));
        }
        Ok(())
    }

    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

fn parse_env<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
    }
}
