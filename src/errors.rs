// src/errors.rs

//! Defines the primary error type for the entire library.

use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the client.
/// Using `thiserror` allows for clean error definitions and automatic `From` trait implementations.
#[derive(Error, Debug)]
pub enum ParlanceError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Websocket error: {0}")]
    WebsocketError(String),

    #[error("HTTP client error: {0}")]
    HttpClientError(String),

    /// A non-success response from the REST API, carrying the platform's error body.
    #[error("API error ({status}): {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The gateway rejected the session with an ERROR frame. The connection is
    /// terminated and a fresh open is required.
    #[error("Gateway protocol error: {0}")]
    GatewayProtocol(String),

    #[error("Gateway connection closed")]
    GatewayClosed,

    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A registered event arrived but its payload did not decode into the
    /// registered shape. Reported on the dispatch error channel.
    #[error("Failed to decode event '{event}': {detail}")]
    EventDecode { event: String, detail: String },

    #[error("Wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("Value is not an integer or out of range")]
    NotAnInteger,

    #[error("value is not a valid float")]
    NotAFloat,

    #[error("value is not a valid boolean")]
    NotABoolean,

    #[error("value is not a valid identifier")]
    NotAnIdentifier,

    #[error("Operation not allowed in the current state: {0}")]
    InvalidState(String),

    #[error("Invalid URL: {0}")]
    UrlError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal Client Error: {0}")]
    Internal(String),
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// We wrap it in an Arc to allow for cheap, shared cloning.
impl Clone for ParlanceError {
    fn clone(&self) -> Self {
        match self {
            ParlanceError::Io(e) => ParlanceError::Io(Arc::clone(e)),
            ParlanceError::WebsocketError(s) => ParlanceError::WebsocketError(s.clone()),
            ParlanceError::HttpClientError(s) => ParlanceError::HttpClientError(s.clone()),
            ParlanceError::Api {
                status,
                code,
                message,
            } => ParlanceError::Api {
                status: *status,
                code: code.clone(),
                message: message.clone(),
            },
            ParlanceError::GatewayProtocol(s) => ParlanceError::GatewayProtocol(s.clone()),
            ParlanceError::GatewayClosed => ParlanceError::GatewayClosed,
            ParlanceError::HandshakeFailed(s) => ParlanceError::HandshakeFailed(s.clone()),
            ParlanceError::MalformedEnvelope(s) => ParlanceError::MalformedEnvelope(s.clone()),
            ParlanceError::EventDecode { event, detail } => ParlanceError::EventDecode {
                event: event.clone(),
                detail: detail.clone(),
            },
            ParlanceError::WrongArgumentCount(s) => ParlanceError::WrongArgumentCount(s.clone()),
            ParlanceError::NotAnInteger => ParlanceError::NotAnInteger,
            ParlanceError::NotAFloat => ParlanceError::NotAFloat,
            ParlanceError::NotABoolean => ParlanceError::NotABoolean,
            ParlanceError::NotAnIdentifier => ParlanceError::NotAnIdentifier,
            ParlanceError::InvalidState(s) => ParlanceError::InvalidState(s.clone()),
            ParlanceError::UrlError(s) => ParlanceError::UrlError(s.clone()),
            ParlanceError::ConfigError(s) => ParlanceError::ConfigError(s.clone()),
            ParlanceError::Internal(s) => ParlanceError::Internal(s.clone()),
        }
    }
}

impl PartialEq for ParlanceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParlanceError::Io(e1), ParlanceError::Io(e2)) => e1.to_string() == e2.to_string(),
            (ParlanceError::WebsocketError(s1), ParlanceError::WebsocketError(s2)) => s1 == s2,
            (ParlanceError::HttpClientError(s1), ParlanceError::HttpClientError(s2)) => s1 == s2,
            (
                ParlanceError::Api {
                    status: st1,
                    code: c1,
                    message: m1,
                },
                ParlanceError::Api {
                    status: st2,
                    code: c2,
                    message: m2,
                },
            ) => st1 == st2 && c1 == c2 && m1 == m2,
            (ParlanceError::GatewayProtocol(s1), ParlanceError::GatewayProtocol(s2)) => s1 == s2,
            (ParlanceError::HandshakeFailed(s1), ParlanceError::HandshakeFailed(s2)) => s1 == s2,
            (ParlanceError::MalformedEnvelope(s1), ParlanceError::MalformedEnvelope(s2)) => {
                s1 == s2
            }
            (
                ParlanceError::EventDecode {
                    event: e1,
                    detail: d1,
                },
                ParlanceError::EventDecode {
                    event: e2,
                    detail: d2,
                },
            ) => e1 == e2 && d1 == d2,
            (ParlanceError::WrongArgumentCount(s1), ParlanceError::WrongArgumentCount(s2)) => {
                s1 == s2
            }
            (ParlanceError::InvalidState(s1), ParlanceError::InvalidState(s2)) => s1 == s2,
            (ParlanceError::UrlError(s1), ParlanceError::UrlError(s2)) => s1 == s2,
            (ParlanceError::ConfigError(s1), ParlanceError::ConfigError(s2)) => s1 == s2,
            (ParlanceError::Internal(s1), ParlanceError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for ParlanceError {
    fn from(e: std::io::Error) -> Self {
        ParlanceError::Io(Arc::new(e))
    }
}

impl From<reqwest::Error> for ParlanceError {
    fn from(e: reqwest::Error) -> Self {
        ParlanceError::HttpClientError(e.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ParlanceError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        ParlanceError::WebsocketError(e.to_string())
    }
}

impl From<url::ParseError> for ParlanceError {
    fn from(e: url::ParseError) -> Self {
        ParlanceError::UrlError(e.to_string())
    }
}

impl From<toml::de::Error> for ParlanceError {
    fn from(e: toml::de::Error) -> Self {
        ParlanceError::ConfigError(e.to_string())
    }
}

impl From<ParseIntError> for ParlanceError {
    fn from(_: ParseIntError) -> Self {
        ParlanceError::NotAnInteger
    }
}

impl From<ParseFloatError> for ParlanceError {
    fn from(_: ParseFloatError) -> Self {
        ParlanceError::NotAFloat
    }
}

impl From<ParseBoolError> for ParlanceError {
    fn from(_: ParseBoolError) -> Self {
        ParlanceError::NotABoolean
    }
}

impl From<serde_json::Error> for ParlanceError {
    fn from(e: serde_json::Error) -> Self {
        ParlanceError::Internal(format!("JSON serialization/deserialization error: {e}"))
    }
}
