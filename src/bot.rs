//! # Bot
//!
//! Owns the modules and hands every platform event to each of them in
//! registration order. Modules filter by their own prefix, so one event is
//! usually acted on by a single module.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

use std::sync::Arc;

use anyhow::{bail, Result};
use log::info;

use crate::commands::CommandDescriptor;
use crate::core::{ComponentEvent, MessageEvent, ReactionEvent, SlashCommandEvent};
use crate::module::{BotContext, BotModule};

/// Platform event in transport-neutral form
#[derive(Debug, Clone)]
pub enum BotEvent {
    Message(MessageEvent),
    Reaction(ReactionEvent),
    SlashCommand(SlashCommandEvent),
    Component(ComponentEvent),
}

pub struct Bot {
    context: BotContext,
    modules: Vec<Arc<BotModule>>,
}

impl Bot {
    pub fn new(context: BotContext) -> Self {
        Self {
            context,
            modules: Vec::new(),
        }
    }

    /// Context to build modules with
    pub fn context(&self) -> &BotContext {
        &self.context
    }

    /// Register a module; internal ids must be unique
    pub fn add_module(&mut self, module: BotModule) -> Result<Arc<BotModule>> {
        if self.module(module.internal_id()).is_some() {
            bail!("module '{}' is already registered", module.internal_id());
        }

        info!(
            "Registered module {} ({} listed, {} unlisted commands)",
            module.internal_id(),
            module.bot_commands().len(),
            module.unlisted_bot_commands().len()
        );
        let module = Arc::new(module);
        self.modules.push(Arc::clone(&module));
        Ok(module)
    }

    pub fn module(&self, internal_id: &str) -> Option<Arc<BotModule>> {
        self.modules
            .iter()
            .find(|module| module.internal_id() == internal_id)
            .cloned()
    }

    pub fn modules(&self) -> &[Arc<BotModule>] {
        &self.modules
    }

    pub async fn dispatch(&self, event: &BotEvent) {
        for module in &self.modules {
            match event {
                BotEvent::Message(event) => module.on_message(event).await,
                BotEvent::Reaction(event) => module.on_reaction(event).await,
                BotEvent::SlashCommand(event) => module.on_slash_command(event).await,
                BotEvent::Component(event) => module.on_component(event).await,
            }
        }
    }

    /// Descriptors of every module for one guild
    pub fn generate_commands(&self, guild_id: &str) -> Vec<CommandDescriptor> {
        self.modules
            .iter()
            .flat_map(|module| module.generate_commands(guild_id))
            .collect()
    }
}
