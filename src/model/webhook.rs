// src/model/webhook.rs

//! Incoming webhooks and their lifecycle event payload.

use super::{ChannelId, ServerId, ServerScoped, UserId, WebhookId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: WebhookId,
    pub name: String,
    pub server_id: ServerId,
    pub channel_id: ChannelId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Only present for webhooks the bot is allowed to post through.
    #[serde(default)]
    pub token: Option<String>,
}

impl ServerScoped for Webhook {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// Payload shared by `ServerWebhookCreated` and `ServerWebhookUpdated`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub server_id: ServerId,
    pub webhook: Webhook,
}

/// Request body for creating a webhook.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhook {
    pub name: String,
    pub channel_id: ChannelId,
}
