// src/model/doc.rs

//! Docs, doc comments, and their event payloads.

use super::{ChannelId, Reactible, ServerId, ServerScoped, Updatable, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doc {
    pub id: u64,
    pub server_id: ServerId,
    pub channel_id: ChannelId,
    pub title: String,
    pub content: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<UserId>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServerScoped for Doc {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

impl Updatable for Doc {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Reactible for Doc {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn reaction_path(&self, emote_id: u64) -> String {
        format!(
            "channels/{}/docs/{}/emotes/{emote_id}",
            self.channel_id, self.id
        )
    }
}

/// Payload shared by `DocCreated`, `DocUpdated`, and `DocDeleted`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocEvent {
    pub server_id: ServerId,
    pub doc: Doc,
}

impl ServerScoped for DocEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocComment {
    pub id: u64,
    pub content: String,
    pub channel_id: ChannelId,
    pub doc_id: u64,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Updatable for DocComment {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Payload shared by the `DocComment*` lifecycle events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocCommentEvent {
    pub server_id: ServerId,
    pub doc_comment: DocComment,
}

/// Request body for creating a doc.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoc {
    pub title: String,
    pub content: String,
}
