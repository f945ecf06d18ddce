// src/commands/router.rs

//! Turns chat-message events into command invocations.

use super::context::{CommandContext, CommandFailure};
use super::params::ArgTokens;
use super::tree::CommandTree;
use crate::errors::ParlanceError;
use crate::model::MessageEvent;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Owns the prefix and the tree; one router serves every socket of a client.
#[derive(Debug)]
pub struct CommandRouter {
    prefix: String,
    tree: Arc<CommandTree>,
}

impl CommandRouter {
    pub fn new(prefix: impl Into<String>, tree: CommandTree) -> Self {
        Self {
            prefix: prefix.into(),
            tree: Arc::new(tree),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn failures(&self) -> broadcast::Receiver<CommandFailure> {
        self.tree.failures()
    }

    /// Routes one message event. Returns `Ok(false)` when the message is not
    /// an invocation at all; `Ok(true)` once resolution ran to completion.
    /// The only error surfaced is a handler's own failure.
    pub async fn route(&self, event: &Arc<MessageEvent>) -> Result<bool, ParlanceError> {
        // Webhook-authored messages never invoke commands; a bot reposting
        // its own prefix must not feed back into itself.
        if event.message.created_by_webhook_id.is_some() {
            return Ok(false);
        }
        let Some(invocation) = event.message.content().strip_prefix(&self.prefix) else {
            return Ok(false);
        };

        trace!(channel = %event.message.channel_id, "routing command invocation");
        let tokens = ArgTokens::parse(invocation);
        let context = CommandContext::new(Arc::clone(event), self.prefix.clone(), tokens);
        self.tree.resolve(context).await?;
        Ok(true)
    }
}
