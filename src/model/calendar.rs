// src/model/calendar.rs

//! Calendar entries, RSVPs, series, comments, and their event payloads.
//!
//! The wire objects are named `calendarEvent*`; the Rust types use "entry"
//! so that payload structs do not end up named `CalendarEventEvent`.

use super::{ChannelId, ServerId, ServerScoped, Updatable, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: u64,
    pub server_id: ServerId,
    pub channel_id: ChannelId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub starts_at: DateTime<Utc>,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub rsvp_limit: Option<u32>,
    #[serde(default)]
    pub series_id: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl ServerScoped for CalendarEntry {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// Payload shared by `CalendarEventCreated`, `CalendarEventUpdated`, and
/// `CalendarEventDeleted`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntryEvent {
    pub server_id: ServerId,
    #[serde(rename = "calendarEvent")]
    pub entry: CalendarEntry,
}

impl ServerScoped for CalendarEntryEvent {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Going,
    Maybe,
    Declined,
    Invited,
    Waitlisted,
    #[serde(rename = "not responded")]
    NotResponded,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRsvp {
    pub calendar_event_id: u64,
    pub channel_id: ChannelId,
    pub server_id: ServerId,
    pub user_id: UserId,
    pub status: RsvpStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<UserId>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ServerScoped for CalendarRsvp {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

impl Updatable for CalendarRsvp {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Payload shared by `CalendarEventRsvpUpdated` and `CalendarEventRsvpDeleted`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRsvpEvent {
    pub server_id: ServerId,
    #[serde(rename = "calendarEventRsvp")]
    pub rsvp: CalendarRsvp,
}

/// Payload for `CalendarEventRsvpManyUpdated`, sent when RSVPs are edited in
/// bulk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRsvpManyEvent {
    pub server_id: ServerId,
    #[serde(rename = "calendarEventRsvps")]
    pub rsvps: Vec<CalendarRsvp>,
}

/// A recurring-entry series. The gateway only identifies the series; entries
/// are delivered individually.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSeries {
    pub id: String,
    pub server_id: ServerId,
    pub channel_id: ChannelId,
}

impl ServerScoped for CalendarSeries {
    fn server_id(&self) -> &str {
        &self.server_id
    }
}

/// Payload shared by `CalendarEventSeriesUpdated` and
/// `CalendarEventSeriesDeleted`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSeriesEvent {
    pub server_id: ServerId,
    #[serde(rename = "calendarEventSeries")]
    pub series: CalendarSeries,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarComment {
    pub id: u64,
    pub content: String,
    pub channel_id: ChannelId,
    pub calendar_event_id: u64,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Updatable for CalendarComment {
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Payload shared by the `CalendarEventComment*` lifecycle events.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCommentEvent {
    pub server_id: ServerId,
    #[serde(rename = "calendarEventComment")]
    pub comment: CalendarComment,
}

/// Request body for creating a calendar entry.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalendarEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}
