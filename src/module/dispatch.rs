//! # Event Dispatch
//!
//! Routes message, reaction, slash command and component events of a module
//! to its commands, tasks and interaction groups.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Generation-checked task removal, request ids in logs

use std::sync::OnceLock;

use log::{debug, error, info, warn};
use regex::Regex;
use uuid::Uuid;

use super::BotModule;
use crate::commands::{parse_invocation, SlashCall, UnlistedCall};
use crate::core::{
    ComponentEvent, Guild, HandlerError, HandlerResult, InteractionRef, MessageEvent,
    OutgoingMessage, ReactionEvent, SlashCommandEvent, User,
};
use crate::interaction::InteractionGroup;
use crate::task::TaskHandle;

static SPACE_RUNS: OnceLock<Regex> = OnceLock::new();

/// Collapse runs of spaces into one
pub fn normalize_whitespace(text: &str) -> String {
    let re = SPACE_RUNS.get_or_init(|| Regex::new(" {2,}").expect("static pattern"));
    re.replace_all(text, " ").into_owned()
}

impl BotModule {
    /// Text message: unlisted command first, otherwise forward to the author's task
    pub async fn on_message(&self, event: &MessageEvent) {
        let Some(guild) = &event.guild else {
            return;
        };
        let author = &event.message.author;
        if author.id == self.context.platform.self_user_id() {
            return;
        }

        let task = self.tasks.get(&guild.id, &author.id);
        let text = normalize_whitespace(&event.message.content);
        let prefix = self.command_prefix(&guild.id);

        if text.starts_with(&prefix) && text.trim() != prefix {
            self.run_unlisted_command(guild, event, &prefix, &text).await;
        } else if let Some(handle) = task {
            self.forward_message(guild, event, handle).await;
        }
    }

    async fn run_unlisted_command(&self, guild: &Guild, event: &MessageEvent, prefix: &str, text: &str) {
        let Some(invocation) = parse_invocation(prefix, text) else {
            return;
        };
        let Some(command) = self.commands.get_unlisted(&invocation.command_id) else {
            // May belong to another module sharing the prefix
            debug!(
                "No unlisted command '{}' in module {}",
                invocation.command_id, self.internal_id
            );
            return;
        };

        let request_id = Uuid::new_v4();
        let author = &event.message.author;
        info!(
            "[{request_id}] [COMMAND][{}][{}][{}] {text}",
            guild.name, event.channel.name, author.name
        );

        let arguments = command.prepare_arguments(invocation.arguments);
        if !command.accepts(arguments.len()) {
            debug!(
                "[{request_id}] {} takes {}..={} arguments, got {}",
                command.id(),
                command.min_arguments(),
                command.max_arguments(),
                arguments.len()
            );
            let reply = OutgoingMessage::error(
                &self.context.text("unlisted_command_title", &[command.id()]),
                author,
                &self.context.text("unlisted_command_argument_number_error", &[]),
            );
            self.send_to_channel(request_id, &event.channel.id, reply).await;
            return;
        }

        let call = UnlistedCall {
            guild,
            channel: &event.channel,
            message: &event.message,
            author,
            arguments: &arguments,
        };
        match command.action().run(self, call).await {
            Ok(true) if self.context.settings.delete_command_messages(&guild.id) => {
                self.delete_message(request_id, &event.channel.id, &event.message.id)
                    .await;
            }
            Ok(_) => {}
            Err(err) => {
                log_failure(request_id, &err);
                if let Some(reply) = self.failure_reply("command_error", author, &err) {
                    self.send_to_channel(request_id, &event.channel.id, reply).await;
                }
            }
        }
    }

    async fn forward_message(&self, guild: &Guild, event: &MessageEvent, handle: TaskHandle) {
        let mut task = handle.lock().await;
        if !self.tasks.is_current(&guild.id, &handle) || task.channel().id != event.channel.id {
            return;
        }

        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] Message {} -> task #{} of {}",
            event.message.id,
            handle.generation(),
            handle.user_id()
        );

        let outcome = task.consume_message(self, &event.message).await;
        let running = task.is_running();
        drop(task);

        if let Some(err) = self.settle_task(request_id, &guild.id, &handle, running, outcome) {
            if let Some(reply) = self.failure_reply("task_action_error", &event.message.author, &err) {
                self.send_to_channel(request_id, &event.channel.id, reply).await;
            }
        }
    }

    /// Reaction: fetched message and emoji go to the reacting user's task
    pub async fn on_reaction(&self, event: &ReactionEvent) {
        let (Some(guild), Some(user)) = (&event.guild, &event.user) else {
            return;
        };
        if user.id == self.context.platform.self_user_id() {
            return;
        }
        let Some(handle) = self.tasks.get(&guild.id, &user.id) else {
            return;
        };

        let request_id = Uuid::new_v4();
        let message = match self
            .context
            .platform
            .fetch_message(&event.channel.id, &event.message_id)
            .await
        {
            Ok(message) => message,
            Err(err) => {
                warn!("[{request_id}] Could not fetch message {}: {err}", event.message_id);
                return;
            }
        };

        let mut task = handle.lock().await;
        // Cancelled or superseded while the fetch was in flight
        if !self.tasks.is_current(&guild.id, &handle) {
            debug!(
                "[{request_id}] Task #{} gone before reaction {} was consumed",
                handle.generation(),
                event.emoji
            );
            return;
        }

        let outcome = task.consume_reaction(self, &message, &event.emoji).await;
        let running = task.is_running();
        drop(task);

        if let Some(err) = self.settle_task(request_id, &guild.id, &handle, running, outcome) {
            if let Some(reply) = self.failure_reply("reaction_action_error", user, &err) {
                self.send_to_channel(request_id, &event.channel.id, reply).await;
            }
        }
    }

    /// Slash command addressed to this module's prefix
    pub async fn on_slash_command(&self, event: &SlashCommandEvent) {
        let Some(guild) = &event.guild else {
            return;
        };
        if event.name != self.module_prefix(&guild.id) {
            return;
        }

        let request_id = Uuid::new_v4();
        info!(
            "[{request_id}] [SLASH COMMAND][{}][{}][{}] {}",
            guild.name,
            event.channel.name,
            event.user.name,
            event.command_path()
        );

        let Some(command) = event
            .subcommand
            .as_deref()
            .and_then(|name| self.commands.get_listed(name))
        else {
            warn!("[{request_id}] No listed command for /{}", event.command_path());
            return;
        };

        let call = SlashCall {
            event,
            guild,
            channel: &event.channel,
            author: &event.user,
        };
        if let Err(err) = command.action().run(self, call).await {
            log_failure(request_id, &err);
            if let Some(reply) = self.failure_reply("command_error", &event.user, &err) {
                self.reply(request_id, &event.interaction, reply).await;
            }
        }
    }

    /// Component click; an active task's group shadows the message's global group
    pub async fn on_component(&self, event: &ComponentEvent) {
        let Some(guild) = &event.guild else {
            return;
        };
        if event.user.id == self.context.platform.self_user_id() {
            return;
        }

        let global = self.interactions.get(&guild.id, &event.message_id);
        let request_id = Uuid::new_v4();

        if let Some(handle) = self.tasks.get(&guild.id, &event.user.id) {
            self.run_task_component(request_id, guild, event, handle).await;
        } else if let Some(group) = global {
            self.run_global_component(request_id, guild, event, &group).await;
        } else {
            debug!(
                "[{request_id}] No interaction group for message {}",
                event.message_id
            );
        }
    }

    async fn run_task_component(&self, request_id: Uuid, guild: &Guild, event: &ComponentEvent, handle: TaskHandle) {
        let task = handle.lock().await;
        if !self.tasks.is_current(&guild.id, &handle) {
            return;
        }
        let Some(callback) = task
            .interaction_group()
            .and_then(|group| group.callback(&event.component_id))
        else {
            debug!(
                "[{request_id}] Task #{} has no callback for {}",
                handle.generation(),
                event.component_id
            );
            return;
        };

        let outcome = match callback.invoke(self, event).await {
            Ok(delete) => {
                self.delete_component_message(request_id, guild, event, delete)
                    .await;
                Ok(())
            }
            Err(err) => Err(err),
        };
        let running = task.is_running();
        drop(task);

        if let Some(err) = self.settle_task(request_id, &guild.id, &handle, running, outcome) {
            if let Some(reply) = self.failure_reply("button_action_error", &event.user, &err) {
                self.reply(request_id, &event.interaction, reply).await;
            }
        }
    }

    async fn run_global_component(&self, request_id: Uuid, guild: &Guild, event: &ComponentEvent, group: &InteractionGroup) {
        let Some(callback) = group.callback(&event.component_id) else {
            debug!("[{request_id}] Unknown component {}", event.component_id);
            return;
        };

        match callback.invoke(self, event).await {
            Ok(delete) => {
                self.delete_component_message(request_id, guild, event, delete)
                    .await
            }
            Err(err) => {
                log_failure(request_id, &err);
                if let Some(reply) = self.failure_reply("button_action_error", &event.user, &err) {
                    self.reply(request_id, &event.interaction, reply).await;
                }
            }
        }
    }

    /// Bookkeeping after a task consumed an event
    ///
    /// Aborting failures and finished tasks are removed through the generation
    /// check, so only the handle that is still registered gets removed. Returns
    /// the failure that should be reported to the user.
    fn settle_task(
        &self,
        request_id: Uuid,
        guild_id: &str,
        handle: &TaskHandle,
        running: bool,
        outcome: HandlerResult<()>,
    ) -> Option<HandlerError> {
        match outcome {
            Ok(()) => {
                if !running && self.tasks.remove_if_current(guild_id, handle) {
                    debug!("[{request_id}] Task #{} finished", handle.generation());
                }
                None
            }
            Err(err) if err.aborts_task() => {
                if self.tasks.remove_if_current(guild_id, handle) {
                    info!(
                        "[{request_id}] Task #{} of {} aborted",
                        handle.generation(),
                        handle.user_id()
                    );
                }
                log_failure(request_id, &err);
                Some(err)
            }
            Err(err) => {
                log_failure(request_id, &err);
                if !running {
                    self.tasks.remove_if_current(guild_id, handle);
                }
                None
            }
        }
    }

    /// Localized error reply for failures users should see
    fn failure_reply(&self, title_key: &str, author: &User, err: &HandlerError) -> Option<OutgoingMessage> {
        let description = match err {
            HandlerError::Permission { permission } => {
                self.context.text("missing_permission_error", &[permission])
            }
            HandlerError::WrongInteraction {
                interaction_id,
                expected,
                found,
            } => self.context.text(
                "interaction_event_type_error",
                &[interaction_id, &expected.to_string(), &found.to_string()],
            ),
            HandlerError::Platform(_) => return None,
        };
        Some(OutgoingMessage::error(
            &self.context.text(title_key, &[]),
            author,
            &description,
        ))
    }

    async fn delete_component_message(&self, request_id: Uuid, guild: &Guild, event: &ComponentEvent, delete: bool) {
        if delete && self.context.settings.delete_command_messages(&guild.id) {
            self.delete_message(request_id, &event.channel.id, &event.message_id)
                .await;
        }
    }

    async fn delete_message(&self, request_id: Uuid, channel_id: &str, message_id: &str) {
        if let Err(err) = self
            .context
            .platform
            .delete_message(channel_id, message_id)
            .await
        {
            warn!("[{request_id}] Could not delete message {message_id}: {err}");
        }
    }

    async fn send_to_channel(&self, request_id: Uuid, channel_id: &str, message: OutgoingMessage) {
        if let Err(err) = self.context.platform.send_message(channel_id, message).await {
            warn!("[{request_id}] Could not send to channel {channel_id}: {err}");
        }
    }

    async fn reply(&self, request_id: Uuid, interaction: &InteractionRef, message: OutgoingMessage) {
        if let Err(err) = self.context.platform.reply(interaction, message, true).await {
            warn!("[{request_id}] Could not reply to interaction {}: {err}", interaction.id);
        }
    }
}

fn log_failure(request_id: Uuid, err: &HandlerError) {
    if err.aborts_task() {
        error!("[{request_id}] {err}");
    } else {
        warn!("[{request_id}] Handler failed: {err:#}");
    }
}
