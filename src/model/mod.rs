// src/model/mod.rs

//! Data model for the Parlance platform: entities carried by gateway events
//! and REST responses, plus the capability traits shared across them.
//!
//! The structs here are deliberately lean. They carry the fields a bot needs
//! to route, reply, and moderate; they are not an exhaustive mirror of every
//! field the platform can emit. Unknown fields are ignored on decode.

pub mod calendar;
pub mod channel;
pub mod doc;
pub mod forum;
pub mod list;
pub mod member;
pub mod message;
pub mod reaction;
pub mod server;
pub mod webhook;

pub use calendar::*;
pub use channel::*;
pub use doc::*;
pub use forum::*;
pub use list::*;
pub use member::*;
pub use message::*;
pub use reaction::*;
pub use server::*;
pub use webhook::*;

use chrono::{DateTime, Utc};

/// Server identifiers are short opaque strings.
pub type ServerId = String;
/// Channels and messages use UUID-form identifiers.
pub type ChannelId = String;
pub type MessageId = String;
pub type UserId = String;
pub type WebhookId = String;
pub type ListItemId = String;

/// Implemented by entities that belong to exactly one server.
pub trait ServerScoped {
    fn server_id(&self) -> &str;
}

/// Implemented by entities that track an edit timestamp.
pub trait Updatable {
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Implemented by entities that accept emote reactions. The path returned is
/// relative to the API base and addresses the entity's reaction collection.
pub trait Reactible {
    fn channel_id(&self) -> &str;
    fn reaction_path(&self, emote_id: u64) -> String;
}
