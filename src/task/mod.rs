//! # Tasks
//!
//! A task is a multi-turn handler owned by one user in one guild. It consumes
//! the user's messages, reactions and component clicks until it reports itself
//! finished, is cancelled, or is superseded by a newer task of the same user.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod registry;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{Channel, HandlerResult, InteractionRef, Message, User};
use crate::interaction::InteractionGroup;
use crate::module::BotModule;

pub use registry::{TaskHandle, TaskRegistry};

#[async_trait]
pub trait Task: Send + Sync {
    /// The only user whose events reach this task
    fn user(&self) -> &User;

    /// Messages are forwarded only when posted in this channel
    fn channel(&self) -> &Channel;

    /// `false` once the task has finished; the dispatcher then drops it
    fn is_running(&self) -> bool;

    /// Interrupted tasks are refused by the registry
    fn is_interrupted(&self) -> bool {
        false
    }

    /// Components of this group take precedence over message-scoped groups
    ///
    /// Its callbacks run while the task is locked; they must share state with
    /// the task through their own handles instead of locking the task again.
    fn interaction_group(&self) -> Option<Arc<InteractionGroup>> {
        None
    }

    /// Send the first prompt; as a reply to `trigger` when one is given
    async fn start(&mut self, module: &BotModule, trigger: Option<&InteractionRef>)
        -> HandlerResult<()>;

    async fn consume_message(&mut self, module: &BotModule, message: &Message) -> HandlerResult<()>;

    async fn consume_reaction(
        &mut self,
        _module: &BotModule,
        _message: &Message,
        _emoji: &str,
    ) -> HandlerResult<()> {
        Ok(())
    }
}
