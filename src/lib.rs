// src/lib.rs

//! An async client library for the Parlance chat platform: a resumable
//! gateway connection, a typed event dispatch table, a declaration-ordered
//! command tree, and REST convenience methods, composed behind one
//! [`Client`](client::Client).

pub mod client;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod gateway;
pub mod http;
pub mod model;

// Re-export
pub use crate::client::{Client, ClientBuilder, EventKind};
pub use crate::errors::ParlanceError;
