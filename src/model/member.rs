// src/model/member.rs

//! Users, server members, and the membership lifecycle event payloads.

use super::{ServerId, ServerScoped, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    #[default]
    User,
    Bot,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(rename = "type", default)]
    pub kind: UserKind,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_bot(&self) -> bool {
        self.kind == UserKind::Bot
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub role_ids: Vec<u64>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_owner: bool,
}

impl Member {
    /// The nickname when set, otherwise the account name.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.user.name)
    }
}

/// A ban record, as returned by the REST API and carried by ban events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberBan {
    pub user: User,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

/// Payload for `ServerMemberJoined`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberJoinedEvent {
    pub server_id: ServerId,
    pub member: Member,
    #[serde(default)]
    pub server_member_count: Option<u64>,
}

impl ServerScoped for MemberJoinedEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// The changed fields carried by `ServerMemberUpdated`. The gateway sends the
/// owning server id as a sibling of `userInfo`; the registered payload
/// transform copies it into this struct before decoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub server_id: ServerId,
    pub id: UserId,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl ServerScoped for MemberUpdate {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// Payload for `ServerMemberUpdated`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdatedEvent {
    pub server_id: ServerId,
    pub user_info: MemberUpdate,
}

/// Payload for `ServerMemberRemoved`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberRemovedEvent {
    pub server_id: ServerId,
    pub user_id: UserId,
    #[serde(default)]
    pub is_kick: bool,
    #[serde(default)]
    pub is_ban: bool,
}

impl ServerScoped for MemberRemovedEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// Payload shared by `ServerMemberBanned` and `ServerMemberUnbanned`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberBanEvent {
    pub server_id: ServerId,
    pub server_member_ban: MemberBan,
}

impl ServerScoped for MemberBanEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}
