// src/gateway/mod.rs

//! The realtime half of the client: the wire envelope and the socket actor
//! that keeps one authenticated websocket alive.

pub mod connection;
pub mod envelope;

pub use connection::{
    DisconnectEvent, GatewayConnection, GatewayHandle, GatewayItem, GatewayOptions, RESUME_HEADER,
};
pub use envelope::{Envelope, ErrorFrame, Resumed, Welcome, opcode};
