//! # Command System
//!
//! Listed (slash) and unlisted (prefix) command definitions and their registry.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod handler;
pub mod listed;
pub mod registry;
pub mod unlisted;

pub use handler::{SlashAction, SlashCall, UnlistedAction, UnlistedCall};
pub use listed::{BotCommand, CommandDescriptor, CommandOption, OptionKind, SubcommandDescriptor};
pub use registry::CommandRegistry;
pub use unlisted::{parse_invocation, CommandInvocation, UnlistedCommand};
