// src/commands/tree.rs

//! Command declarations and the resolution walk.
//!
//! A tree is an ordered list of nodes; resolution scans it top to bottom and
//! commits to the first node whose name (or alias) matches the head token and,
//! for leaves, whose parameter list accepts the remaining token count.
//! Containers delegate the narrowed window to their children. Invocations
//! that reach no handler produce a [`CommandFailure`] on the tree's failure
//! channel and nothing else.

use super::context::{CommandContext, CommandFailure, FailureReason};
use super::handler::CommandHandler;
use super::params::{ParamSpec, accepts_arity, bind_values};
use crate::errors::ParlanceError;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{Instrument, debug, info_span};

/// Capacity of the failure broadcast channel.
pub(crate) const FAILURE_CHANNEL_CAPACITY: usize = 128;

/// A runnable command: parameter shapes plus the handler they feed.
pub struct Leaf {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) params: Vec<ParamSpec>,
    pub(crate) handler: Arc<dyn CommandHandler>,
}

impl Leaf {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("params", &self.params.len())
            .finish()
    }
}

/// A named grouping whose children are resolved against the remaining tokens.
#[derive(Debug)]
pub struct Container {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) children: Vec<CommandNode>,
}

impl Container {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }
}

#[derive(Debug)]
pub enum CommandNode {
    Leaf(Leaf),
    Container(Container),
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            CommandNode::Leaf(leaf) => leaf.name(),
            CommandNode::Container(container) => container.name(),
        }
    }

    /// Case-sensitive exact match against the name or any alias.
    fn matches(&self, token: &str) -> bool {
        let (name, aliases) = match self {
            CommandNode::Leaf(leaf) => (&leaf.name, &leaf.aliases),
            CommandNode::Container(container) => (&container.name, &container.aliases),
        };
        name == token || aliases.iter().any(|alias| alias == token)
    }
}

/// The declared command set. Immutable once built; declaration order is
/// resolution order.
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    failures: broadcast::Sender<CommandFailure>,
}

impl CommandTree {
    pub fn builder() -> super::builder::CommandTreeBuilder {
        super::builder::CommandTreeBuilder::new()
    }

    pub(crate) fn with_nodes(nodes: Vec<CommandNode>) -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        Self { nodes, failures }
    }

    /// Top-level nodes in declaration order.
    pub fn nodes(&self) -> &[CommandNode] {
        &self.nodes
    }

    /// Subscribes to invocations that resolve to no handler.
    pub fn failures(&self) -> broadcast::Receiver<CommandFailure> {
        self.failures.subscribe()
    }

    /// Resolves one invocation to completion: at most one handler runs, and
    /// every non-handled outcome emits exactly one failure signal. The only
    /// error returned is the handler's own.
    pub async fn resolve(&self, context: CommandContext) -> Result<(), ParlanceError> {
        self.resolve_level(&self.nodes, context).await
    }

    fn resolve_level<'a>(
        &'a self,
        nodes: &'a [CommandNode],
        context: CommandContext,
    ) -> BoxFuture<'a, Result<(), ParlanceError>> {
        Box::pin(async move {
            let Some(name) = context.args.first().map(str::to_string) else {
                self.signal(FailureReason::Unspecified, context);
                return Ok(());
            };
            let rest = context.args.tail();

            for node in nodes {
                if !node.matches(&name) {
                    continue;
                }
                match node {
                    CommandNode::Container(container) => {
                        let child = context.descend(&name, rest);
                        return self.resolve_level(&container.children, child).await;
                    }
                    CommandNode::Leaf(leaf) => {
                        // A same-name leaf with a different arity may still
                        // qualify further down the list.
                        if !accepts_arity(&leaf.params, rest.len()) {
                            continue;
                        }
                        let child = context.descend(&name, rest.clone());
                        return match bind_values(&leaf.params, &rest, &leaf.name) {
                            Ok(values) => {
                                let span = info_span!("command", name = %leaf.name);
                                leaf.handler.invoke(self, child, values).instrument(span).await
                            }
                            Err(error) => {
                                debug!(command = %leaf.name, %error, "argument binding failed");
                                self.signal(FailureReason::NotFound, child);
                                Ok(())
                            }
                        };
                    }
                }
            }

            self.signal(FailureReason::NotFound, context);
            Ok(())
        })
    }

    fn signal(&self, reason: FailureReason, context: CommandContext) {
        let _ = self.failures.send(CommandFailure { reason, context });
    }
}

impl fmt::Debug for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("nodes", &self.nodes)
            .finish()
    }
}
