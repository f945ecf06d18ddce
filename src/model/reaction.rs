// src/model/reaction.rs

//! Emote reactions across every reactible surface.
//!
//! Each surface has its own reaction record naming the container it points
//! into; the generic [`ReactionEvent`] wrapper carries any of them.

use super::{ChannelId, MessageId, ServerId, UserId};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Emote {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Payload shared by every reaction created/deleted event pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
pub struct ReactionEvent<R> {
    #[serde(default)]
    pub server_id: Option<ServerId>,
    pub reaction: R,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageReaction {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub created_by: UserId,
    pub emote: Emote,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForumTopicReaction {
    pub channel_id: ChannelId,
    pub forum_topic_id: u64,
    pub created_by: UserId,
    pub emote: Emote,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForumTopicCommentReaction {
    pub channel_id: ChannelId,
    pub forum_topic_id: u64,
    pub forum_topic_comment_id: u64,
    pub created_by: UserId,
    pub emote: Emote,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocReaction {
    pub channel_id: ChannelId,
    pub doc_id: u64,
    pub created_by: UserId,
    pub emote: Emote,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocCommentReaction {
    pub channel_id: ChannelId,
    pub doc_id: u64,
    pub doc_comment_id: u64,
    pub created_by: UserId,
    pub emote: Emote,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCommentReaction {
    pub channel_id: ChannelId,
    pub calendar_event_id: u64,
    pub calendar_event_comment_id: u64,
    pub created_by: UserId,
    pub emote: Emote,
}

pub type MessageReactionEvent = ReactionEvent<MessageReaction>;
pub type ForumTopicReactionEvent = ReactionEvent<ForumTopicReaction>;
pub type ForumTopicCommentReactionEvent = ReactionEvent<ForumTopicCommentReaction>;
pub type DocReactionEvent = ReactionEvent<DocReaction>;
pub type DocCommentReactionEvent = ReactionEvent<DocCommentReaction>;
pub type CalendarCommentReactionEvent = ReactionEvent<CalendarCommentReaction>;
