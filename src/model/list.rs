// src/model/list.rs

//! List items and their event payload.

use super::{ChannelId, ListItemId, ServerId, ServerScoped, Updatable, UserId, WebhookId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: ListItemId,
    pub server_id: ServerId,
    pub channel_id: ChannelId,
    /// The item's body text.
    pub message: String,
    pub created_by: UserId,
    #[serde(default)]
    pub created_by_webhook_id: Option<WebhookId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_by: Option<UserId>,
    #[serde(default)]
    pub parent_list_item_id: Option<ListItemId>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_by: Option<UserId>,
}

impl ListItem {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl ServerScoped for ListItem {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

impl Updatable for ListItem {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Payload shared by the `ListItem*` lifecycle events (created, updated,
/// deleted, completed, uncompleted).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListItemEvent {
    pub server_id: ServerId,
    pub list_item: ListItem,
}

impl ServerScoped for ListItemEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// Request body for creating a list item.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateListItem {
    pub message: String,
}
