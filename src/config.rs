// src/config.rs

//! Manages client configuration: loading, defaults, and validation.

use crate::errors::ParlanceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Top-level configuration for a [`crate::client::Client`].
///
/// Every field except `token` has a sensible default, so a minimal TOML file
/// (or `ClientConfig::new(token)`) is enough to get a bot running.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientConfig {
    /// The bot's session token, sent as a bearer credential on both the REST
    /// and gateway surfaces.
    pub token: String,

    /// Base URL for the REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// URL of the primary gateway socket.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Heartbeat cadence used until the gateway announces its own interval in
    /// the WELCOME frame.
    #[serde(with = "humantime_serde", default = "default_heartbeat_interval")]
    pub heartbeat_interval: Duration,

    /// Prefix that marks a chat message as a command invocation.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Capacity of every broadcast channel handed to event subscribers.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Tuning for the initial handshake retry budget and the reconnect backoff
/// applied after a transport-level drop.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReconnectConfig {
    /// How many times `open` attempts the handshake before giving up.
    #[serde(default = "default_open_attempts")]
    pub open_attempts: u32,

    /// First backoff delay; doubles on every consecutive failure.
    #[serde(with = "humantime_serde", default = "default_initial_delay")]
    pub initial_delay: Duration,

    /// Ceiling for the exponential backoff.
    #[serde(with = "humantime_serde", default = "default_max_delay")]
    pub max_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            open_attempts: default_open_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.parlance.chat/v1".to_string()
}
fn default_gateway_url() -> String {
    "wss://gateway.parlance.chat/v1".to_string()
}
fn default_heartbeat_interval() -> Duration {
    Duration::from_millis(22_500) // matches the gateway's advertised default
}
fn default_command_prefix() -> String {
    "!".to_string()
}
fn default_event_buffer() -> usize {
    128
}
fn default_open_attempts() -> u32 {
    4
}
fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}
fn default_max_delay() -> Duration {
    Duration::from_secs(64)
}

impl ClientConfig {
    /// Creates a configuration with the given token and all defaults.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base_url: default_api_base_url(),
            gateway_url: default_gateway_url(),
            heartbeat_interval: default_heartbeat_interval(),
            command_prefix: default_command_prefix(),
            event_buffer: default_event_buffer(),
            reconnect: ReconnectConfig::default(),
        }
    }

    /// Creates a new `ClientConfig` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self, ParlanceError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ParlanceError::ConfigError(format!("Failed to read config file at '{path}': {e}"))
        })?;
        let config: ClientConfig = toml::from_str(&contents).map_err(|e| {
            ParlanceError::ConfigError(format!("Failed to parse TOML from '{path}': {e}"))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<(), ParlanceError> {
        if self.token.trim().is_empty() {
            return Err(ParlanceError::ConfigError("token cannot be empty".into()));
        }
        if self.event_buffer == 0 {
            return Err(ParlanceError::ConfigError(
                "event_buffer cannot be 0".into(),
            ));
        }
        if self.command_prefix.is_empty() {
            return Err(ParlanceError::ConfigError(
                "command_prefix cannot be empty".into(),
            ));
        }
        if self.reconnect.open_attempts == 0 {
            return Err(ParlanceError::ConfigError(
                "reconnect.open_attempts cannot be 0".into(),
            ));
        }
        if self.reconnect.max_delay < self.reconnect.initial_delay {
            return Err(ParlanceError::ConfigError(
                "reconnect.max_delay cannot be below reconnect.initial_delay".into(),
            ));
        }

        let api = Url::parse(&self.api_base_url)
            .map_err(|e| ParlanceError::ConfigError(format!("invalid api_base_url: {e}")))?;
        if !matches!(api.scheme(), "http" | "https") {
            return Err(ParlanceError::ConfigError(
                "api_base_url must use http or https".into(),
            ));
        }

        let gateway = Url::parse(&self.gateway_url)
            .map_err(|e| ParlanceError::ConfigError(format!("invalid gateway_url: {e}")))?;
        if !matches!(gateway.scheme(), "ws" | "wss") {
            return Err(ParlanceError::ConfigError(
                "gateway_url must use ws or wss".into(),
            ));
        }

        if self.heartbeat_interval.is_zero() {
            return Err(ParlanceError::ConfigError(
                "heartbeat_interval cannot be 0".into(),
            ));
        }
        if self.heartbeat_interval < Duration::from_secs(5) {
            warn!(
                "low heartbeat_interval setting: {:?}. The gateway may treat rapid pings as abuse.",
                self.heartbeat_interval
            );
        }

        Ok(())
    }
}
