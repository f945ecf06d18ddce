// src/gateway/envelope.rs

//! The wire envelope shared by every gateway frame, and the payloads of the
//! protocol-reserved opcodes.

use crate::errors::ParlanceError;
use crate::model::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway opcodes. Domain events use [`opcode::EVENT`] and are keyed by
/// `eventName`; the rest are protocol frames keyed by opcode alone.
pub mod opcode {
    /// A named domain event.
    pub const EVENT: u8 = 0;
    /// Session accepted. The payload announces the heartbeat cadence.
    pub const WELCOME: u8 = 1;
    /// Resume acknowledged; missed frames have been replayed.
    pub const RESUME: u8 = 2;
    /// The gateway rejected the session. Terminal for this connection.
    pub const ERROR: u8 = 8;
}

/// One decoded gateway frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub opcode: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Replay cursor. Tracked per connection and echoed on re-handshake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event_cursor: Option<String>,
}

impl Envelope {
    /// Decodes a text frame into an envelope.
    pub fn parse(text: &str) -> Result<Self, ParlanceError> {
        serde_json::from_str(text).map_err(|e| ParlanceError::MalformedEnvelope(e.to_string()))
    }

    /// Builds a named domain-event frame.
    pub fn event(name: impl Into<String>, payload: Value) -> Self {
        Self {
            opcode: opcode::EVENT,
            event_name: Some(name.into()),
            payload: Some(payload),
            last_event_cursor: None,
        }
    }

    /// Builds a protocol frame carrying only an opcode and payload.
    pub fn protocol(opcode: u8, payload: Value) -> Self {
        Self {
            opcode,
            event_name: None,
            payload: Some(payload),
            last_event_cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.last_event_cursor = Some(cursor.into());
        self
    }
}

/// Payload of the WELCOME frame (opcode 1).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    /// Heartbeat cadence the gateway expects, in milliseconds.
    pub heartbeat_interval_ms: u64,
    #[serde(default)]
    pub last_event_cursor: Option<String>,
    #[serde(default)]
    pub bot_id: Option<UserId>,
}

/// Payload of the RESUME acknowledgement frame (opcode 2).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Resumed {
    #[serde(default)]
    pub last_event_cursor: Option<String>,
}

/// Payload of the ERROR frame (opcode 8).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ErrorFrame {
    #[serde(default)]
    pub message: String,
}
