// src/model/server.rs

//! Servers and the bot-membership event payloads.

use super::{ChannelId, ServerId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: ServerId,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub default_channel_id: Option<ChannelId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `BotServerMembershipCreated`: the bot was added to a server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotMembershipCreatedEvent {
    pub server: Server,
    pub created_by: UserId,
}

/// Payload for `BotServerMembershipDeleted`: the bot was removed from a server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotMembershipDeletedEvent {
    pub server: Server,
    pub deleted_by: UserId,
}
