// src/commands/handler.rs

//! The handler seam every leaf command is invoked through.

use super::context::CommandContext;
use super::params::ParamValue;
use super::tree::CommandTree;
use crate::errors::ParlanceError;
use async_trait::async_trait;
use std::future::Future;

/// Invoked when a leaf command wins resolution and its arguments bind.
///
/// `tree` is the tree the invocation was resolved against, for handlers that
/// inspect sibling commands (help output and the like). `values` are the
/// bound arguments in declaration order.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn invoke(
        &self,
        tree: &CommandTree,
        context: CommandContext,
        values: Vec<ParamValue>,
    ) -> Result<(), ParlanceError>;
}

/// Adapts a plain async closure into a [`CommandHandler`]. The tree parameter
/// is dropped; implement the trait directly when it is needed.
pub struct FnHandler<F> {
    inner: F,
}

impl<F> FnHandler<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F, Fut> CommandHandler for FnHandler<F>
where
    F: Fn(CommandContext, Vec<ParamValue>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ParlanceError>> + Send + 'static,
{
    async fn invoke(
        &self,
        _tree: &CommandTree,
        context: CommandContext,
        values: Vec<ParamValue>,
    ) -> Result<(), ParlanceError> {
        (self.inner)(context, values).await
    }
}
