// src/commands/context.rs

//! Per-invocation context and the failure signal surfaced when resolution
//! cannot reach a handler.

use super::params::ArgTokens;
use crate::model::MessageEvent;
use std::sync::Arc;
use strum_macros::Display;

/// Everything a handler (or failure subscriber) knows about one invocation.
/// A fresh value is produced at each nesting level; the originating event is
/// shared, the token window narrows.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// The chat-message event that carried the invocation.
    pub event: Arc<MessageEvent>,
    /// The prefix that marked the message as an invocation.
    pub prefix: String,
    /// First token after the prefix; empty when the message held only the
    /// prefix.
    pub root_name: String,
    /// Tokens after the root command name.
    pub root_args: ArgTokens,
    /// The sub-command name matched at the current level, if any.
    pub matched: Option<String>,
    /// The token window still unconsumed at the current level. At the root
    /// this starts with the root command name itself.
    pub args: ArgTokens,
}

impl CommandContext {
    /// Builds the root context for one invocation. `invocation` holds every
    /// token after the prefix.
    pub fn new(event: Arc<MessageEvent>, prefix: impl Into<String>, invocation: ArgTokens) -> Self {
        let root_name = invocation.first().unwrap_or_default().to_string();
        let root_args = invocation.tail();
        Self {
            event,
            prefix: prefix.into(),
            root_name,
            root_args,
            matched: None,
            args: invocation,
        }
    }

    /// The context one level deeper: `name` has been matched and `rest` is
    /// what remains.
    pub(crate) fn descend(&self, name: &str, rest: ArgTokens) -> Self {
        Self {
            event: Arc::clone(&self.event),
            prefix: self.prefix.clone(),
            root_name: self.root_name.clone(),
            root_args: self.root_args.clone(),
            matched: Some(name.to_string()),
            args: rest,
        }
    }

    /// Channel the invoking message was posted in.
    pub fn channel_id(&self) -> &str {
        &self.event.message.channel_id
    }

    /// Author of the invoking message.
    pub fn author_id(&self) -> &str {
        &self.event.message.created_by
    }
}

/// Why resolution stopped without invoking a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FailureReason {
    /// No command token was present at this level.
    Unspecified,
    /// No declared command accepted the token sequence.
    NotFound,
}

/// Broadcast for every invocation that does not reach a handler. Nothing is
/// replied to the channel unless a subscriber chooses to.
#[derive(Debug, Clone)]
pub struct CommandFailure {
    pub reason: FailureReason,
    /// The context exactly as it stood when resolution stopped.
    pub context: CommandContext,
}
