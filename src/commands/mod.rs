// src/commands/mod.rs

//! Prefix-triggered bot commands: declaration, resolution, and failure
//! signalling.
//!
//! Commands are declared once, up front, through [`CommandTree::builder`];
//! the built tree is immutable. Resolution is first-match in declaration
//! order, with leaf candidates filtered by whether their parameter list can
//! accept the provided token count. Anything that does not reach a handler
//! is reported on the tree's failure channel and otherwise ignored.

pub mod builder;
pub mod context;
pub mod handler;
pub mod params;
pub mod router;
pub mod tree;

pub use builder::{CommandTreeBuilder, ContainerBuilder, LeafBuilder};
pub use context::{CommandContext, CommandFailure, FailureReason};
pub use handler::{CommandHandler, FnHandler};
pub use params::{ArgTokens, ParamShape, ParamSpec, ParamValue, accepts_arity, bind_values};
pub use router::CommandRouter;
pub use tree::{CommandNode, CommandTree, Container, Leaf};
