// src/commands/builder.rs

//! Construction-time declaration of a command tree.
//!
//! Declarations are plain data until `build()`, which validates them and
//! produces the immutable tree: parameter lists must keep optional parameters
//! trailing and a capture-rest final, and every leaf needs a handler.

use super::context::CommandContext;
use super::handler::{CommandHandler, FnHandler};
use super::params::{ParamShape, ParamSpec, ParamValue};
use super::tree::{CommandNode, CommandTree, Container, Leaf};
use crate::errors::ParlanceError;
use std::future::Future;
use std::sync::Arc;

enum NodeDecl {
    Leaf(LeafBuilder),
    Container(ContainerBuilder),
}

impl NodeDecl {
    fn build(self) -> Result<CommandNode, ParlanceError> {
        match self {
            NodeDecl::Leaf(leaf) => leaf.build().map(CommandNode::Leaf),
            NodeDecl::Container(container) => container.build().map(CommandNode::Container),
        }
    }
}

/// Declares one leaf command.
pub struct LeafBuilder {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    params: Vec<ParamSpec>,
    handler: Option<Arc<dyn CommandHandler>>,
}

impl Leaf {
    /// Starts declaring a leaf command with the given primary name.
    pub fn declare(name: impl Into<String>) -> LeafBuilder {
        LeafBuilder {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            params: Vec::new(),
            handler: None,
        }
    }
}

impl LeafBuilder {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, name: impl Into<String>, shape: ParamShape) -> Self {
        self.params.push(ParamSpec::required(name, shape));
        self
    }

    pub fn optional(mut self, name: impl Into<String>, shape: ParamShape) -> Self {
        self.params.push(ParamSpec::optional(name, shape));
        self
    }

    /// Declares a final parameter that captures the remaining tokens verbatim.
    pub fn rest(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec::rest(name));
        self
    }

    pub fn optional_rest(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec::optional_rest(name));
        self
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn handler(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Installs an async closure as the handler.
    pub fn handler_fn<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(CommandContext, Vec<ParamValue>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ParlanceError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(FnHandler::new(handler)));
        self
    }

    fn build(self) -> Result<Leaf, ParlanceError> {
        validate_word("command name", &self.name)?;
        for alias in &self.aliases {
            validate_word("alias", alias)?;
        }
        validate_params(&self.name, &self.params)?;
        let handler = self.handler.ok_or_else(|| {
            ParlanceError::ConfigError(format!("command '{}' has no handler", self.name))
        })?;

        Ok(Leaf {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            params: self.params,
            handler,
        })
    }
}

/// Declares one container command and its children.
pub struct ContainerBuilder {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    children: Vec<NodeDecl>,
}

impl Container {
    /// Starts declaring a container command with the given primary name.
    pub fn declare(name: impl Into<String>) -> ContainerBuilder {
        ContainerBuilder {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            children: Vec::new(),
        }
    }
}

impl ContainerBuilder {
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn command(mut self, leaf: LeafBuilder) -> Self {
        self.children.push(NodeDecl::Leaf(leaf));
        self
    }

    pub fn container(mut self, container: ContainerBuilder) -> Self {
        self.children.push(NodeDecl::Container(container));
        self
    }

    fn build(self) -> Result<Container, ParlanceError> {
        validate_word("command name", &self.name)?;
        for alias in &self.aliases {
            validate_word("alias", alias)?;
        }
        let children = self
            .children
            .into_iter()
            .map(NodeDecl::build)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Container {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            children,
        })
    }
}

/// Declares the full tree. Declaration order is resolution order.
pub struct CommandTreeBuilder {
    nodes: Vec<NodeDecl>,
}

impl CommandTreeBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn command(mut self, leaf: LeafBuilder) -> Self {
        self.nodes.push(NodeDecl::Leaf(leaf));
        self
    }

    pub fn container(mut self, container: ContainerBuilder) -> Self {
        self.nodes.push(NodeDecl::Container(container));
        self
    }

    pub fn build(self) -> Result<CommandTree, ParlanceError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(NodeDecl::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CommandTree::with_nodes(nodes))
    }
}

impl Default for CommandTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_word(what: &str, value: &str) -> Result<(), ParlanceError> {
    if value.is_empty() {
        return Err(ParlanceError::ConfigError(format!("{what} cannot be empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ParlanceError::ConfigError(format!(
            "{what} '{value}' cannot contain whitespace"
        )));
    }
    Ok(())
}

fn validate_params(command: &str, params: &[ParamSpec]) -> Result<(), ParlanceError> {
    let mut seen_optional = false;
    for (index, param) in params.iter().enumerate() {
        if param.is_rest() && index + 1 != params.len() {
            return Err(ParlanceError::ConfigError(format!(
                "command '{command}': capture-rest parameter '{}' must be final",
                param.name()
            )));
        }
        if param.is_optional() {
            seen_optional = true;
        } else if seen_optional {
            return Err(ParlanceError::ConfigError(format!(
                "command '{command}': required parameter '{}' follows an optional one",
                param.name()
            )));
        }
    }
    Ok(())
}
