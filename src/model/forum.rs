// src/model/forum.rs

//! Forum topics, topic comments, and their event payloads.

use super::{ChannelId, Reactible, ServerId, ServerScoped, Updatable, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForumTopic {
    pub id: u64,
    pub server_id: ServerId,
    pub channel_id: ChannelId,
    pub title: String,
    /// Absent in summary listings.
    #[serde(default)]
    pub content: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bumped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl ServerScoped for ForumTopic {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

impl Updatable for ForumTopic {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Reactible for ForumTopic {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn reaction_path(&self, emote_id: u64) -> String {
        format!(
            "channels/{}/topics/{}/emotes/{emote_id}",
            self.channel_id, self.id
        )
    }
}

/// Payload shared by the `ForumTopic*` lifecycle events (created, updated,
/// deleted, pinned, unpinned, locked, unlocked).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForumTopicEvent {
    pub server_id: ServerId,
    pub forum_topic: ForumTopic,
}

impl ServerScoped for ForumTopicEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForumTopicComment {
    pub id: u64,
    pub content: String,
    pub channel_id: ChannelId,
    pub forum_topic_id: u64,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Updatable for ForumTopicComment {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl Reactible for ForumTopicComment {
    fn channel_id(&self) -> &str {
        &self.channel_id
    }

    fn reaction_path(&self, emote_id: u64) -> String {
        format!(
            "channels/{}/topics/{}/comments/{}/emotes/{emote_id}",
            self.channel_id, self.forum_topic_id, self.id
        )
    }
}

/// Payload shared by the `ForumTopicComment*` lifecycle events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForumTopicCommentEvent {
    pub server_id: ServerId,
    pub forum_topic_comment: ForumTopicComment,
}

/// Request body for creating a forum topic.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateForumTopic {
    pub title: String,
    pub content: String,
}
