//! Configuration management for the exchange clients.

use crate::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_MESSAGE_COUNT: usize = 10;
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const DEFAULT_FLUSH_TIMEOUT_MS: u64 = 5000;
const DEFAULT_METADATA_TIMEOUT_MS: u64 = 5000;

/// How the receive loop counts progress toward its message target when a
/// payload fails to deserialize: `Received` counts every polled message
/// (a corrupt-payload run may finish with fewer parsed records than
/// requested), `Parsed` counts only successfully parsed ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountPolicy {
    #[default]
    Received,
    Parsed,
}

impl CountPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "received" => Some(Self::Received),
            "parsed" => Some(Self::Parsed),
            _ => None,
        }
    }
}

/// Credential bundle for remote brokers. All fields optional; the Verifier
/// rejects remote endpoints with an incomplete key/secret pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// API key, used as the SASL username.
    pub api_key: Option<String>,

    /// API secret, used as the SASL password.
    pub api_secret: Option<String>,

    /// Client identifier override.
    pub client_id: Option<String>,
}

impl Credentials {
    /// Read the credential bundle from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("CC_API_KEY").ok(),
            api_secret: env::var("CC_API_SECRET").ok(),
            client_id: env::var("CLIENT_ID").ok(),
        }
    }
}

/// Process-wide settings, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Broker bootstrap address (host:port or comma-separated list). May be
    /// empty: the Verifier reports the misconfiguration, not the loader.
    #[serde(default)]
    pub bootstrap_servers: String,

    /// Topic to produce into or consume from.
    #[serde(default)]
    pub topic: String,

    /// Remote-broker credentials.
    #[serde(default)]
    pub credentials: Credentials,

    /// Consumer group identifier (consumer side only).
    #[serde(default = "default_group_id")]
    pub group_id: String,

    /// Number of messages to send or receive before exiting.
    #[serde(default = "default_message_count")]
    pub message_count: usize,

    /// Receive poll interval in milliseconds. Bounds signal latency.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Producer flush timeout in milliseconds.
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,

    /// Metadata fetch timeout for setup verification, in milliseconds.
    #[serde(default = "default_metadata_timeout_ms")]
    pub metadata_timeout_ms: u64,

    /// Progress counting policy for unparseable payloads.
    #[serde(default)]
    pub count_policy: CountPolicy,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_group_id() -> String {
    "txnflow-consumer".to_string()
}

fn default_message_count() -> usize {
    DEFAULT_MESSAGE_COUNT
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_flush_timeout_ms() -> u64 {
    DEFAULT_FLUSH_TIMEOUT_MS
}

fn default_metadata_timeout_ms() -> u64 {
    DEFAULT_METADATA_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ClientSettings {
    /// Load settings from `CONFIG_FILE` (TOML) if set, otherwise from
    /// environment variables, then apply environment overrides and validate.
    pub fn load() -> ClientResult<Self> {
        let mut settings = if let Ok(path) = env::var("CONFIG_FILE") {
            Self::from_file(&path)?
        } else {
            Self::from_env()
        };

        settings.apply_env_overrides();
        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from environment variables.
    ///
    /// Environment variables:
    /// - `CC_BOOTSTRAP_SERVER`: Broker bootstrap address
    /// - `CC_TOPIC`: Topic name
    /// - `CC_API_KEY` / `CC_API_SECRET`: Credential pair for remote brokers
    /// - `CLIENT_ID`: Client identifier override
    /// - `GROUP_ID`: Consumer group (default: txnflow-consumer)
    /// - `MESSAGE_COUNT`: Messages per run (default: 10)
    /// - `POLL_INTERVAL_MS`: Receive poll interval in ms (default: 100)
    /// - `FLUSH_TIMEOUT_MS`: Producer flush timeout in ms (default: 5000)
    /// - `METADATA_TIMEOUT_MS`: Verification timeout in ms (default: 5000)
    /// - `COUNT_POLICY`: received | parsed (default: received)
    /// - `LOG_LEVEL`: Log level (default: info)
    pub fn from_env() -> Self {
        let bootstrap_servers = env::var("CC_BOOTSTRAP_SERVER").unwrap_or_default();
        let topic = env::var("CC_TOPIC").unwrap_or_default();
        let credentials = Credentials::from_env();

        let group_id = env::var("GROUP_ID")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_group_id);

        let message_count = env::var("MESSAGE_COUNT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MESSAGE_COUNT);

        let poll_interval_ms = env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        let flush_timeout_ms = env::var("FLUSH_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FLUSH_TIMEOUT_MS);

        let metadata_timeout_ms = env::var("METADATA_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_METADATA_TIMEOUT_MS);

        let count_policy = env::var("COUNT_POLICY")
            .ok()
            .and_then(|s| CountPolicy::parse(&s))
            .unwrap_or_default();

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| default_log_level());

        Self {
            bootstrap_servers,
            topic,
            credentials,
            group_id,
            message_count,
            poll_interval_ms,
            flush_timeout_ms,
            metadata_timeout_ms,
            count_policy,
            log_level,
        }
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &str) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("Failed to read config file {}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            ClientError::config(format!("Failed to parse config file {}: {}", path, e))
        })
    }

    /// Apply environment variable overrides on top of file-loaded settings.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("CC_BOOTSTRAP_SERVER") {
            self.bootstrap_servers = val;
        }
        if let Ok(val) = env::var("CC_TOPIC") {
            self.topic = val;
        }
        if let Ok(val) = env::var("CC_API_KEY") {
            self.credentials.api_key = Some(val);
        }
        if let Ok(val) = env::var("CC_API_SECRET") {
            self.credentials.api_secret = Some(val);
        }
        if let Ok(val) = env::var("CLIENT_ID") {
            self.credentials.client_id = Some(val);
        }
        if let Ok(val) = env::var("GROUP_ID") {
            self.group_id = val;
        }
        if let Ok(val) = env::var("MESSAGE_COUNT") {
            if let Ok(n) = val.parse() {
                self.message_count = n;
            }
        }
        if let Ok(val) = env::var("POLL_INTERVAL_MS") {
            if let Ok(n) = val.parse() {
                self.poll_interval_ms = n;
            }
        }
        if let Ok(val) = env::var("FLUSH_TIMEOUT_MS") {
            if let Ok(n) = val.parse() {
                self.flush_timeout_ms = n;
            }
        }
        if let Ok(val) = env::var("METADATA_TIMEOUT_MS") {
            if let Ok(n) = val.parse() {
                self.metadata_timeout_ms = n;
            }
        }
        if let Ok(val) = env::var("COUNT_POLICY") {
            if let Some(policy) = CountPolicy::parse(&val) {
                self.count_policy = policy;
            }
        }
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.log_level = val;
        }
    }

    /// Validate the settings. Endpoint and topic emptiness are deliberately
    /// not checked here: the Verifier owns those failures.
    pub fn validate(&self) -> ClientResult<()> {
        if self.message_count == 0 {
            return Err(ClientError::config("message_count must be > 0"));
        }

        if self.poll_interval_ms == 0 {
            return Err(ClientError::config("poll_interval_ms must be > 0"));
        }

        if self.group_id.is_empty() {
            return Err(ClientError::config("group_id cannot be empty"));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:9092".to_string(),
            topic: "transactions".to_string(),
            credentials: Credentials::default(),
            group_id: default_group_id(),
            message_count: DEFAULT_MESSAGE_COUNT,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            flush_timeout_ms: DEFAULT_FLUSH_TIMEOUT_MS,
            metadata_timeout_ms: DEFAULT_METADATA_TIMEOUT_MS,
            count_policy: CountPolicy::default(),
            log_level: default_log_level(),
        }
    }
}
