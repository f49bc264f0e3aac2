//! # Bot Modules
//!
//! A module bundles a command set with its own per-guild prefix table, task
//! registry and interaction registry, and routes platform events to them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Registries, prefix fan-out, built-in help and cancel commands

mod builtin;
pub mod context;
mod dispatch;

use std::sync::Arc;

use dashmap::DashMap;

use crate::commands::{BotCommand, CommandDescriptor, CommandRegistry, UnlistedCommand};
use crate::core::{HandlerResult, InteractionRef};
use crate::interaction::{InteractionGroup, InteractionRegistry};
use crate::task::{Task, TaskHandle, TaskRegistry};

pub use builtin::{CancelCommand, HelpCommand, HELP_OPTION};
pub use context::BotContext;
pub use dispatch::normalize_whitespace;

pub struct BotModule {
    internal_id: String,
    name: String,
    /// Guild id -> module prefix
    prefixes: DashMap<String, String>,
    commands: CommandRegistry,
    tasks: TaskRegistry,
    interactions: InteractionRegistry,
    context: BotContext,
}

impl BotModule {
    /// Create a module with the built-in `help` and `cancel` commands
    ///
    /// `internal_id` doubles as the default prefix in guilds without an override.
    pub fn new(internal_id: &str, context: BotContext) -> Self {
        let module = Self {
            internal_id: internal_id.to_string(),
            name: internal_id.to_string(),
            prefixes: DashMap::new(),
            commands: CommandRegistry::new(),
            tasks: TaskRegistry::new(),
            interactions: InteractionRegistry::new(),
            context,
        };
        builtin::register(&module);
        module
    }

    /// Readable name shown in help listings
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn internal_id(&self) -> &str {
        &self.internal_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &BotContext {
        &self.context
    }

    /// Prefix of the module in a guild
    ///
    /// On the first lookup for a guild the settings store is consulted; without
    /// an override there the internal id is used.
    pub fn module_prefix(&self, guild_id: &str) -> String {
        if let Some(prefix) = self.prefixes.get(guild_id) {
            return prefix.value().clone();
        }

        match self.context.settings.module_prefix(guild_id, &self.internal_id) {
            Some(prefix) => {
                self.set_module_prefix(guild_id, &prefix);
                prefix
            }
            None => self
                .prefixes
                .entry(guild_id.to_string())
                .or_insert_with(|| self.internal_id.clone())
                .value()
                .clone(),
        }
    }

    /// Change the prefix for a guild, including every registered unlisted command
    pub fn set_module_prefix(&self, guild_id: &str, prefix: &str) {
        self.commands.set_guild_prefix(guild_id, prefix);
        self.prefixes
            .insert(guild_id.to_string(), prefix.to_string());
    }

    /// Command symbol of the guild followed by the module prefix, e.g. `!poll`
    pub fn command_prefix(&self, guild_id: &str) -> String {
        format!(
            "{}{}",
            self.context.settings.command_symbol(guild_id),
            self.module_prefix(guild_id)
        )
    }

    pub fn add_bot_command(&self, command: BotCommand) {
        self.commands.add_listed(command);
    }

    pub fn remove_bot_command(&self, id: &str) -> Option<Arc<BotCommand>> {
        self.commands.remove_listed(id)
    }

    pub fn get_bot_command(&self, id: &str) -> Option<Arc<BotCommand>> {
        self.commands.get_listed(id)
    }

    /// Listed commands in registration order
    pub fn bot_commands(&self) -> Vec<Arc<BotCommand>> {
        self.commands.listed()
    }

    pub fn add_unlisted_bot_command(&self, command: UnlistedCommand) {
        let command = self.commands.add_unlisted(command, &self.internal_id);

        // Guilds that changed the prefix before this command existed
        for entry in self.prefixes.iter() {
            command.set_module_prefix(entry.key(), entry.value());
        }
    }

    pub fn remove_unlisted_bot_command(&self, id: &str) -> Option<Arc<UnlistedCommand>> {
        self.commands.remove_unlisted(id)
    }

    pub fn get_unlisted_bot_command(&self, id: &str) -> Option<Arc<UnlistedCommand>> {
        self.commands.get_unlisted(id)
    }

    pub fn unlisted_bot_commands(&self) -> Vec<Arc<UnlistedCommand>> {
        self.commands.unlisted()
    }

    /// One top-level descriptor holding every listed command as a subcommand
    ///
    /// Empty when the module has no prefix in the guild.
    pub fn generate_commands(&self, guild_id: &str) -> Vec<CommandDescriptor> {
        let prefix = self.module_prefix(guild_id);
        if prefix.is_empty() {
            return Vec::new();
        }

        vec![CommandDescriptor {
            name: prefix,
            description: self.context.text("main_module_command_desc", &[]),
            subcommands: self
                .commands
                .listed()
                .iter()
                .map(|command| command.descriptor())
                .collect(),
        }]
    }

    pub fn task(&self, guild_id: &str, user_id: &str) -> Option<TaskHandle> {
        self.tasks.get(guild_id, user_id)
    }

    /// Register a task without starting it, superseding the user's current one
    pub fn add_task(&self, guild_id: &str, task: Box<dyn Task>) -> Option<TaskHandle> {
        self.tasks.insert(guild_id, task)
    }

    /// Returns `false` when the user had no task
    pub fn remove_task(&self, guild_id: &str, user_id: &str) -> bool {
        self.tasks.remove(guild_id, user_id).is_some()
    }

    pub fn active_tasks(&self, guild_id: &str) -> usize {
        self.tasks.len(guild_id)
    }

    /// Register then start a task
    ///
    /// With a trigger the task answers that interaction, otherwise it posts on
    /// its own. Start failures are returned to the caller after the usual
    /// abort/finish bookkeeping.
    pub async fn start_task(
        &self,
        guild_id: &str,
        task: Box<dyn Task>,
        trigger: Option<&InteractionRef>,
    ) -> HandlerResult<()> {
        let Some(handle) = self.tasks.insert(guild_id, task) else {
            return Ok(());
        };

        let mut task = handle.lock().await;
        if !self.tasks.is_current(guild_id, &handle) {
            return Ok(());
        }

        let outcome = task.start(self, trigger).await;
        let running = task.is_running();
        drop(task);

        let failed = outcome.as_ref().err().is_some_and(|e| e.aborts_task());
        if failed || !running {
            self.tasks.remove_if_current(guild_id, &handle);
        }
        outcome
    }

    pub fn add_interaction_group(&self, guild_id: &str, message_id: &str, group: InteractionGroup) {
        self.interactions.add(guild_id, message_id, group);
    }

    pub fn get_interaction_group(&self, guild_id: &str, message_id: &str) -> Option<Arc<InteractionGroup>> {
        self.interactions.get(guild_id, message_id)
    }

    pub fn remove_interaction_group(&self, guild_id: &str, message_id: &str) -> Option<Arc<InteractionGroup>> {
        self.interactions.remove(guild_id, message_id)
    }
}
