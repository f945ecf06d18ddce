// src/model/message.rs

//! Chat messages and their gateway event payloads.

use super::{ChannelId, MessageId, Reactible, ServerId, Updatable, UserId, WebhookId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Distinguishes ordinary chat messages from platform-generated notices.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Default,
    System,
}

/// A chat message as delivered by the gateway or the REST API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    /// Absent for direct messages.
    #[serde(default)]
    pub server_id: Option<ServerId>,
    #[serde(default)]
    pub group_id: Option<String>,
    pub channel_id: ChannelId,
    /// Markdown body. Absent for embed-only messages.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reply_message_ids: Option<Vec<MessageId>>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_silent: bool,
    pub created_by: UserId,
    /// Set when the author is a webhook rather than a user.
    #[serde(default)]
    pub created_by_webhook_id: Option<WebhookId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Message {
    /// The markdown body, or an empty string for embed-only messages.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

impl Updatable for Message {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Reactible for Message {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn reaction_path(&self, emote_id: u64) -> String {
        format!(
            "channels/{}/messages/{}/emotes/{emote_id}",
            self.channel_id, self.id
        )
    }
}

/// Payload for `ChatMessageCreated` and `ChatMessageUpdated`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(default)]
    pub server_id: Option<ServerId>,
    pub message: Message,
}

/// The tombstone left behind by a deletion; the full body is not replayed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub server_id: Option<ServerId>,
    pub deleted_at: DateTime<Utc>,
    #[serde(default)]
    pub is_private: bool,
}

/// Payload for `ChatMessageDeleted`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDeletedEvent {
    #[serde(default)]
    pub server_id: Option<ServerId>,
    pub message: DeletedMessage,
}

/// Request body for creating a chat message.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_message_ids: Option<Vec<MessageId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_silent: Option<bool>,
}

impl CreateMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Marks the new message as a reply to the given message.
    pub fn in_reply_to(mut self, message_id: impl Into<MessageId>) -> Self {
        self.reply_message_ids
            .get_or_insert_with(Vec::new)
            .push(message_id.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.is_private = Some(true);
        self
    }

    pub fn silent(mut self) -> Self {
        self.is_silent = Some(true);
        self
    }
}
