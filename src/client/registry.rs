// src/client/registry.rs

//! The event registration table: the single source of truth for which gateway
//! frames a client understands and which payload type each one decodes into.
//!
//! The `domain_events!` macro is used to generate the [`EventKind`] enum, its
//! wire-name table, the registration function, and one typed stream getter
//! per event, keeping all four in lockstep from a single listing.

use crate::dispatch::{DispatchTable, DispatchTableBuilder, EventKey};
use crate::errors::ParlanceError;
use crate::gateway::envelope::{Resumed, Welcome, opcode};
use crate::model::*;
use serde_json::Value;
use std::fmt;
use strum_macros::EnumString;
use tokio_stream::wrappers::BroadcastStream;

macro_rules! domain_events {
    (
        $(
            ($variant:ident, $getter:ident, $payload:ty $(, transform: $transform:expr)?)
        ),+ $(,)?
    ) => {
        /// Every domain event in the shipped registration table, in
        /// registration order. Variant names are exactly the camel-case
        /// event names used on the wire, and `FromStr` parses them back.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
        pub enum EventKind {
            $( $variant, )+
        }

        impl EventKind {
            /// The event name as it appears on the wire.
            pub fn wire_name(self) -> &'static str {
                match self {
                    $( EventKind::$variant => stringify!($variant), )+
                }
            }

            /// The dispatch key this event is registered under.
            pub fn key(self) -> EventKey {
                EventKey::name(self.wire_name())
            }

            /// All known domain events, in registration order.
            pub const ALL: &'static [EventKind] = &[ $( EventKind::$variant, )+ ];
        }

        fn register_domain_events(mut builder: DispatchTableBuilder) -> DispatchTableBuilder {
            $(
                builder = domain_events!(@register builder, $variant, $payload $(, $transform)?);
            )+
            builder
        }

        impl crate::client::Client {
            $(
                #[doc = concat!("A typed stream of `", stringify!($variant), "` events.")]
                pub fn $getter(&self) -> BroadcastStream<$payload> {
                    self.stream(&EventKind::$variant.key())
                }
            )+
        }
    };

    (@register $builder:expr, $variant:ident, $payload:ty) => {
        $builder.register::<$payload>(EventKind::$variant.key())
    };
    (@register $builder:expr, $variant:ident, $payload:ty, $transform:expr) => {
        $builder.register_with::<$payload, _>(EventKind::$variant.key(), $transform)
    };
}

domain_events! {
    // --- Chat messages ---
    (ChatMessageCreated, on_message_created, MessageEvent),
    (ChatMessageUpdated, on_message_updated, MessageEvent),
    (ChatMessageDeleted, on_message_deleted, MessageDeletedEvent),
    (ChannelMessageReactionCreated, on_message_reaction_created, MessageReactionEvent),
    (ChannelMessageReactionDeleted, on_message_reaction_deleted, MessageReactionEvent),

    // --- Members, bans, and bot membership ---
    (ServerMemberJoined, on_member_joined, MemberJoinedEvent),
    (ServerMemberUpdated, on_member_updated, MemberUpdatedEvent, transform: nest_server_id),
    (ServerMemberRemoved, on_member_removed, MemberRemovedEvent),
    (ServerMemberBanned, on_member_banned, MemberBanEvent),
    (ServerMemberUnbanned, on_member_unbanned, MemberBanEvent),
    (BotServerMembershipCreated, on_bot_membership_created, BotMembershipCreatedEvent),
    (BotServerMembershipDeleted, on_bot_membership_deleted, BotMembershipDeletedEvent),

    // --- Channels and webhooks ---
    (ServerChannelCreated, on_channel_created, ChannelEvent),
    (ServerChannelUpdated, on_channel_updated, ChannelEvent),
    (ServerChannelDeleted, on_channel_deleted, ChannelEvent),
    (ServerWebhookCreated, on_webhook_created, WebhookEvent),
    (ServerWebhookUpdated, on_webhook_updated, WebhookEvent),

    // --- Forum topics ---
    (ForumTopicCreated, on_forum_topic_created, ForumTopicEvent),
    (ForumTopicUpdated, on_forum_topic_updated, ForumTopicEvent),
    (ForumTopicDeleted, on_forum_topic_deleted, ForumTopicEvent),
    (ForumTopicPinned, on_forum_topic_pinned, ForumTopicEvent),
    (ForumTopicUnpinned, on_forum_topic_unpinned, ForumTopicEvent),
    (ForumTopicLocked, on_forum_topic_locked, ForumTopicEvent),
    (ForumTopicUnlocked, on_forum_topic_unlocked, ForumTopicEvent),
    (ForumTopicReactionCreated, on_forum_topic_reaction_created, ForumTopicReactionEvent),
    (ForumTopicReactionDeleted, on_forum_topic_reaction_deleted, ForumTopicReactionEvent),
    (ForumTopicCommentCreated, on_forum_topic_comment_created, ForumTopicCommentEvent),
    (ForumTopicCommentUpdated, on_forum_topic_comment_updated, ForumTopicCommentEvent),
    (ForumTopicCommentDeleted, on_forum_topic_comment_deleted, ForumTopicCommentEvent),
    (ForumTopicCommentReactionCreated, on_forum_topic_comment_reaction_created, ForumTopicCommentReactionEvent),
    (ForumTopicCommentReactionDeleted, on_forum_topic_comment_reaction_deleted, ForumTopicCommentReactionEvent),

    // --- List items ---
    (ListItemCreated, on_list_item_created, ListItemEvent),
    (ListItemUpdated, on_list_item_updated, ListItemEvent),
    (ListItemDeleted, on_list_item_deleted, ListItemEvent),
    (ListItemCompleted, on_list_item_completed, ListItemEvent),
    (ListItemUncompleted, on_list_item_uncompleted, ListItemEvent),

    // --- Docs ---
    (DocCreated, on_doc_created, DocEvent),
    (DocUpdated, on_doc_updated, DocEvent),
    (DocDeleted, on_doc_deleted, DocEvent),
    (DocReactionCreated, on_doc_reaction_created, DocReactionEvent),
    (DocReactionDeleted, on_doc_reaction_deleted, DocReactionEvent),
    (DocCommentCreated, on_doc_comment_created, DocCommentEvent),
    (DocCommentUpdated, on_doc_comment_updated, DocCommentEvent),
    (DocCommentDeleted, on_doc_comment_deleted, DocCommentEvent),
    (DocCommentReactionCreated, on_doc_comment_reaction_created, DocCommentReactionEvent),
    (DocCommentReactionDeleted, on_doc_comment_reaction_deleted, DocCommentReactionEvent),

    // --- Calendar entries ---
    (CalendarEventCreated, on_calendar_entry_created, CalendarEntryEvent),
    (CalendarEventUpdated, on_calendar_entry_updated, CalendarEntryEvent),
    (CalendarEventDeleted, on_calendar_entry_deleted, CalendarEntryEvent),
    (CalendarEventRsvpUpdated, on_calendar_rsvp_updated, CalendarRsvpEvent),
    (CalendarEventRsvpManyUpdated, on_calendar_rsvp_many_updated, CalendarRsvpManyEvent),
    (CalendarEventRsvpDeleted, on_calendar_rsvp_deleted, CalendarRsvpEvent),
    (CalendarEventSeriesUpdated, on_calendar_series_updated, CalendarSeriesEvent),
    (CalendarEventSeriesDeleted, on_calendar_series_deleted, CalendarSeriesEvent),
    (CalendarEventCommentCreated, on_calendar_comment_created, CalendarCommentEvent),
    (CalendarEventCommentUpdated, on_calendar_comment_updated, CalendarCommentEvent),
    (CalendarEventCommentDeleted, on_calendar_comment_deleted, CalendarCommentEvent),
    (CalendarEventCommentReactionCreated, on_calendar_comment_reaction_created, CalendarCommentReactionEvent),
    (CalendarEventCommentReactionDeleted, on_calendar_comment_reaction_deleted, CalendarCommentReactionEvent),
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Builds the shipped registration table: the two protocol opcodes plus every
/// [`EventKind`], in declaration order.
pub fn build_dispatch_table(capacity: usize) -> DispatchTable {
    let builder = DispatchTable::builder(capacity)
        .register::<Welcome>(EventKey::opcode(opcode::WELCOME))
        .register::<Resumed>(EventKey::opcode(opcode::RESUME));
    register_domain_events(builder).build()
}

/// `ServerMemberUpdated` delivers the changed fields under `userInfo` with
/// the server id as a sibling; the inner struct is server-scoped on its own,
/// so the id is copied into `userInfo` before decoding.
fn nest_server_id(mut payload: Value) -> Result<Value, ParlanceError> {
    if let Some(object) = payload.as_object_mut() {
        let server_id = object.get("serverId").cloned();
        if let (Some(server_id), Some(Value::Object(info))) =
            (server_id, object.get_mut("userInfo"))
        {
            info.entry("serverId").or_insert(server_id);
        }
    }
    Ok(payload)
}
