// src/model/channel.rs

//! Server channels and their lifecycle event payload.

use super::{ChannelId, ServerId, ServerScoped, Updatable, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The content type a channel carries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Announcements,
    Chat,
    Calendar,
    Forums,
    Media,
    Docs,
    Voice,
    List,
    Scheduling,
    Stream,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerChannel {
    pub id: ChannelId,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub name: String,
    #[serde(default)]
    pub topic: Option<String>,
    pub server_id: ServerId,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<u64>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_public: bool,
}

impl ServerScoped for ServerChannel {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

impl Updatable for ServerChannel {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Payload shared by `ServerChannelCreated`, `ServerChannelUpdated`, and
/// `ServerChannelDeleted`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEvent {
    pub server_id: ServerId,
    pub channel: ServerChannel,
}

impl ServerScoped for ChannelEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// Request body for creating a channel.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateChannel {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<ServerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl CreateChannel {
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            topic: None,
            server_id: None,
            group_id: None,
            category_id: None,
            is_public: None,
        }
    }

    pub fn in_server(mut self, server_id: impl Into<ServerId>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }
}
