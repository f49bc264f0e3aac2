//! Unlisted commands: free-text commands triggered by `<symbol><prefix> <id> ...`

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use super::handler::UnlistedAction;

/// Command id and raw argument tokens split out of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command_id: String,
    pub arguments: Vec<String>,
}

/// Split `<prefix><id> <arg>...` into its parts
///
/// Returns `None` when the text does not start with `prefix` or nothing
/// follows it.
pub fn parse_invocation(prefix: &str, text: &str) -> Option<CommandInvocation> {
    let rest = text.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace().map(str::to_string);
    let command_id = tokens.next()?;

    Some(CommandInvocation {
        command_id,
        arguments: tokens.collect(),
    })
}

pub struct UnlistedCommand {
    id: String,
    help: String,
    arguments: String,
    min_arguments: usize,
    max_arguments: usize,
    join_arguments: bool,
    default_prefix: String,
    /// Guild id -> module prefix, written by the module on prefix changes
    prefixes: DashMap<String, String>,
    action: Arc<dyn UnlistedAction>,
}

impl UnlistedCommand {
    /// New command taking no arguments
    pub fn new(id: &str, action: impl UnlistedAction + 'static) -> Self {
        Self {
            id: id.to_string(),
            help: String::new(),
            arguments: String::new(),
            min_arguments: 0,
            max_arguments: 0,
            join_arguments: false,
            default_prefix: String::new(),
            prefixes: DashMap::new(),
            action: Arc::new(action),
        }
    }

    /// Inclusive bounds on the number of arguments
    pub fn arity(mut self, min: usize, max: usize) -> Self {
        self.min_arguments = min;
        self.max_arguments = max.max(min);
        self
    }

    /// Re-join all tokens into one argument before validation
    pub fn join_arguments(mut self, join: bool) -> Self {
        self.join_arguments = join;
        self
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Usage of the arguments, e.g. `<question> [options...]`
    pub fn arguments(mut self, arguments: &str) -> Self {
        self.arguments = arguments.to_string();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    pub fn min_arguments(&self) -> usize {
        self.min_arguments
    }

    pub fn max_arguments(&self) -> usize {
        self.max_arguments
    }

    pub fn joins_arguments(&self) -> bool {
        self.join_arguments
    }

    pub(crate) fn action(&self) -> Arc<dyn UnlistedAction> {
        Arc::clone(&self.action)
    }

    pub(crate) fn stamp_default_prefix(&mut self, prefix: &str) {
        self.default_prefix = prefix.to_string();
    }

    pub fn set_module_prefix(&self, guild_id: &str, prefix: &str) {
        self.prefixes
            .insert(guild_id.to_string(), prefix.to_string());
    }

    /// Prefix for a guild, the module's internal id unless reconfigured
    pub fn module_prefix(&self, guild_id: &str) -> String {
        self.prefixes
            .get(guild_id)
            .map(|p| p.clone())
            .unwrap_or_else(|| self.default_prefix.clone())
    }

    pub fn accepts(&self, count: usize) -> bool {
        (self.min_arguments..=self.max_arguments).contains(&count)
    }

    /// Apply the join flag to raw tokens; no tokens stay no arguments
    pub fn prepare_arguments(&self, tokens: Vec<String>) -> Vec<String> {
        if self.join_arguments && !tokens.is_empty() {
            vec![tokens.join(" ")]
        } else {
            tokens
        }
    }

    /// `<symbol><prefix> <id> <arguments>` as shown in help listings
    pub fn arguments_description(&self, guild_id: &str, command_symbol: &str) -> String {
        let usage = format!(
            "{}{} {}",
            command_symbol,
            self.module_prefix(guild_id),
            self.id
        );
        if self.arguments.is_empty() {
            usage
        } else {
            format!("{usage} {}", self.arguments)
        }
    }
}

impl fmt::Debug for UnlistedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlistedCommand")
            .field("id", &self.id)
            .field("min_arguments", &self.min_arguments)
            .field("max_arguments", &self.max_arguments)
            .field("join_arguments", &self.join_arguments)
            .field("default_prefix", &self.default_prefix)
            .finish_non_exhaustive()
    }
}
