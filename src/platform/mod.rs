//! # Platform Port
//!
//! The narrow surface the dispatcher needs from the chat transport. Every
//! call can fail with a [`HandlerError`], adapters map "missing permission"
//! responses to [`HandlerError::Permission`] so callers can react to them.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod serenity;

use async_trait::async_trait;

use crate::core::{HandlerResult, InteractionRef, Message, OutgoingMessage};

#[async_trait]
pub trait Platform: Send + Sync {
    /// Id of the bot's own user, events authored by it are ignored
    fn self_user_id(&self) -> &str;

    /// Post a message to a channel, returning the new message id
    async fn send_message(&self, channel_id: &str, message: OutgoingMessage)
        -> HandlerResult<String>;

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> HandlerResult<()>;

    /// Fetch the full content of a message by id
    async fn fetch_message(&self, channel_id: &str, message_id: &str) -> HandlerResult<Message>;

    /// Answer an interaction, visible only to the caller when `ephemeral`
    async fn reply(
        &self,
        interaction: &InteractionRef,
        message: OutgoingMessage,
        ephemeral: bool,
    ) -> HandlerResult<()>;
}
