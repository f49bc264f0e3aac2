//! Listed commands: structured subcommands shown in the client command menu

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::handler::SlashAction;

/// Type of a structured option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
}

/// A typed option of a listed command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
}

impl CommandOption {
    pub fn new(name: &str, description: &str, kind: OptionKind, required: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            required,
        }
    }
}

/// Descriptor of one subcommand, as sent to the platform for registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcommandDescriptor {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
}

/// Descriptor of a module's top-level command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub subcommands: Vec<SubcommandDescriptor>,
}

/// A listed command
///
/// Arguments come from structured options, so the positional arity is always 0.
pub struct BotCommand {
    id: String,
    description: String,
    options: Vec<CommandOption>,
    action: Arc<dyn SlashAction>,
}

impl BotCommand {
    pub fn new(id: &str, description: &str, action: impl SlashAction + 'static) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            options: Vec::new(),
            action: Arc::new(action),
        }
    }

    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    pub fn min_arguments(&self) -> usize {
        0
    }

    pub fn max_arguments(&self) -> usize {
        0
    }

    pub(crate) fn action(&self) -> Arc<dyn SlashAction> {
        Arc::clone(&self.action)
    }

    pub fn descriptor(&self) -> SubcommandDescriptor {
        SubcommandDescriptor {
            name: self.id.clone(),
            description: self.description.clone(),
            options: self.options.clone(),
        }
    }
}

impl fmt::Debug for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotCommand")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
