// Core layer - shared types, errors and configuration
pub mod core;

// Command definitions and registry
pub mod commands;

// Interaction groups and tasks
pub mod interaction;
pub mod task;

// Modules and event dispatch
pub mod bot;
pub mod module;

// Collaborators
pub mod i18n;
pub mod platform;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use bot::{Bot, BotEvent};
pub use crate::core::{Config, HandlerError, HandlerResult};
pub use module::{BotContext, BotModule};
