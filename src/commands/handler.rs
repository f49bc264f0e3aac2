//! Command action traits
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Separate capabilities for listed (slash) and unlisted (prefix) actions

use async_trait::async_trait;

use crate::core::{Channel, Guild, HandlerResult, Message, SlashCommandEvent, User};
use crate::module::BotModule;

/// Everything a listed command action receives
pub struct SlashCall<'a> {
    pub event: &'a SlashCommandEvent,
    pub guild: &'a Guild,
    pub channel: &'a Channel,
    pub author: &'a User,
}

/// Everything an unlisted command action receives
pub struct UnlistedCall<'a> {
    pub guild: &'a Guild,
    pub channel: &'a Channel,
    pub message: &'a Message,
    pub author: &'a User,
    /// Validated against the command's arity, already joined if requested
    pub arguments: &'a [String],
}

/// Action behind a listed (menu-visible) subcommand
///
/// # Example
///
/// ```ignore
/// pub struct PingAction;
///
/// #[async_trait]
/// impl SlashAction for PingAction {
///     async fn run(&self, module: &BotModule, call: SlashCall<'_>) -> HandlerResult<()> {
///         let reply = OutgoingMessage::simple("Ping", call.author, "Pong!");
///         module.context().platform.reply(&call.event.interaction, reply, false).await
///     }
/// }
/// ```
#[async_trait]
pub trait SlashAction: Send + Sync {
    async fn run(&self, module: &BotModule, call: SlashCall<'_>) -> HandlerResult<()>;
}

/// Action behind an unlisted (prefix-triggered) command
#[async_trait]
pub trait UnlistedAction: Send + Sync {
    /// Returns whether the triggering message may be deleted
    async fn run(&self, module: &BotModule, call: UnlistedCall<'_>) -> HandlerResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both traits must stay object-safe, the registry stores them as `dyn`
    fn _assert_slash_object_safe(_: &dyn SlashAction) {}
    fn _assert_unlisted_object_safe(_: &dyn UnlistedAction) {}
}
