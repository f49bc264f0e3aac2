//! # Serenity Adapter
//!
//! [`Platform`] over serenity's HTTP client and builders, plus conversions from
//! serenity gateway models into the dispatcher's event types.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use async_trait::async_trait;
use serenity::builder::{CreateApplicationCommand, CreateInteractionResponse};
use serenity::cache::Cache;
use serenity::http::{Http, HttpError};
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::component::ComponentType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption, CommandDataOptionValue,
};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::{Message as SerenityMessage, Reaction, ReactionType};
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::model::user::User as SerenityUser;
use serenity::model::ModelError;
use serenity::Error as SerenityError;

use super::Platform;
use crate::commands::{CommandDescriptor, OptionKind};
use crate::core::embeds::{message_components, message_embed};
use crate::core::{
    Channel, ComponentEvent, ComponentKind, Guild, HandlerError, HandlerResult, InteractionRef,
    Message, MessageEvent, OptionValue, OutgoingMessage, ReactionEvent, SlashCommandEvent, User,
};

/// Discord JSON error code for "Missing Permissions"
const MISSING_PERMISSIONS: isize = 50013;

pub struct SerenityPlatform {
    http: Arc<Http>,
    self_user_id: String,
}

impl SerenityPlatform {
    /// Resolves the bot's own user id once, up front
    pub async fn connect(http: Arc<Http>) -> anyhow::Result<Self> {
        let me = http
            .get_current_user()
            .await
            .context("failed to fetch the bot user")?;
        Ok(Self {
            http,
            self_user_id: me.id.to_string(),
        })
    }

    /// Overwrite the guild's application commands with `descriptors`
    pub async fn register_commands(&self, guild_id: &str, descriptors: &[CommandDescriptor]) -> HandlerResult<()> {
        GuildId(parse_id(guild_id)?)
            .set_application_commands(&self.http, |commands| {
                for descriptor in descriptors {
                    commands.add_application_command(application_command(descriptor));
                }
                commands
            })
            .await
            .map_err(|e| classify(e, "USE_APPLICATION_COMMANDS", "command registration"))?;
        Ok(())
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    fn self_user_id(&self) -> &str {
        &self.self_user_id
    }

    async fn send_message(&self, channel_id: &str, message: OutgoingMessage) -> HandlerResult<String> {
        let embed = message_embed(&message);
        let components = message_components(&message.buttons);

        let sent = ChannelId(parse_id(channel_id)?)
            .send_message(&self.http, |m| m.set_embed(embed).set_components(components))
            .await
            .map_err(|e| classify(e, "SEND_MESSAGES", "send message"))?;
        Ok(sent.id.to_string())
    }

    async fn delete_message(&self, channel_id: &str, message_id: &str) -> HandlerResult<()> {
        ChannelId(parse_id(channel_id)?)
            .delete_message(&self.http, MessageId(parse_id(message_id)?))
            .await
            .map_err(|e| classify(e, "MANAGE_MESSAGES", "delete message"))
    }

    async fn fetch_message(&self, channel_id: &str, message_id: &str) -> HandlerResult<Message> {
        let message = self
            .http
            .get_message(parse_id(channel_id)?, parse_id(message_id)?)
            .await
            .map_err(|e| classify(e, "READ_MESSAGE_HISTORY", "fetch message"))?;
        Ok(convert_message(&message))
    }

    async fn reply(&self, interaction: &InteractionRef, message: OutgoingMessage, ephemeral: bool) -> HandlerResult<()> {
        let body = interaction_response(&message, ephemeral)?;

        self.http
            .create_interaction_response(parse_id(&interaction.id)?, &interaction.token, &body)
            .await
            .map_err(|e| classify(e, "SEND_MESSAGES", "interaction reply"))
    }
}

/// Channel-message response carrying the rendered embed and buttons
///
/// Only the interaction id and token are kept across dispatch, so the builder
/// is serialized here and posted through [`Http`] directly.
fn interaction_response(message: &OutgoingMessage, ephemeral: bool) -> HandlerResult<serde_json::Value> {
    let embed = message_embed(message);
    let components = message_components(&message.buttons);

    let mut response = CreateInteractionResponse::default();
    response
        .kind(InteractionResponseType::ChannelMessageWithSource)
        .interaction_response_data(|data| {
            data.add_embed(embed)
                .set_components(components)
                .ephemeral(ephemeral)
        });

    serde_json::to_value(&response.0)
        .map_err(|e| HandlerError::Platform(anyhow::Error::new(e).context("interaction response encoding failed")))
}

fn parse_id(id: &str) -> HandlerResult<u64> {
    id.parse::<u64>()
        .map_err(|_| HandlerError::Platform(anyhow!("'{id}' is not a snowflake id")))
}

/// Map serenity failures, permission denials become [`HandlerError::Permission`]
fn classify(err: SerenityError, permission: &str, operation: &str) -> HandlerError {
    if let SerenityError::Model(ModelError::InvalidPermissions(missing)) = &err {
        return HandlerError::permission(missing.get_permission_names().join(", "));
    }
    if let SerenityError::Http(http) = &err {
        if let HttpError::UnsuccessfulRequest(response) = http.as_ref() {
            if response.error.code == MISSING_PERMISSIONS {
                return HandlerError::permission(permission);
            }
        }
    }
    HandlerError::Platform(anyhow::Error::new(err).context(format!("{operation} failed")))
}

fn option_type(kind: OptionKind) -> CommandOptionType {
    match kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Boolean => CommandOptionType::Boolean,
        OptionKind::User => CommandOptionType::User,
        OptionKind::Channel => CommandOptionType::Channel,
        OptionKind::Role => CommandOptionType::Role,
    }
}

/// Application command with one subcommand per listed command
pub fn application_command(descriptor: &CommandDescriptor) -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name(&descriptor.name)
        .description(&descriptor.description);

    for sub in &descriptor.subcommands {
        command.create_option(|option| {
            option
                .name(&sub.name)
                .description(&sub.description)
                .kind(CommandOptionType::SubCommand);
            for param in &sub.options {
                option.create_sub_option(|o| {
                    o.name(&param.name)
                        .description(&param.description)
                        .kind(option_type(param.kind))
                        .required(param.required)
                });
            }
            option
        });
    }

    command
}

fn convert_user(user: &SerenityUser) -> User {
    User {
        id: user.id.to_string(),
        name: user.name.clone(),
        bot: user.bot,
    }
}

fn convert_message(message: &SerenityMessage) -> Message {
    Message {
        id: message.id.to_string(),
        channel_id: message.channel_id.to_string(),
        author: convert_user(&message.author),
        content: message.content.clone(),
    }
}

fn guild(cache: &Cache, guild_id: Option<GuildId>) -> Option<Guild> {
    guild_id.map(|id| Guild {
        id: id.to_string(),
        name: cache
            .guild_field(id, |g| g.name.clone())
            .unwrap_or_else(|| id.to_string()),
    })
}

fn channel(cache: &Cache, channel_id: ChannelId) -> Channel {
    Channel {
        id: channel_id.to_string(),
        name: cache
            .guild_channel_field(channel_id, |c| c.name.clone())
            .unwrap_or_else(|| channel_id.to_string()),
    }
}

fn cached_user(cache: &Cache, user_id: UserId) -> User {
    match cache.user(user_id) {
        Some(user) => convert_user(&user),
        None => User {
            id: user_id.to_string(),
            name: user_id.to_string(),
            bot: false,
        },
    }
}

pub fn message_event(cache: &Cache, message: &SerenityMessage) -> MessageEvent {
    MessageEvent {
        guild: guild(cache, message.guild_id),
        channel: channel(cache, message.channel_id),
        message: convert_message(message),
    }
}

pub fn reaction_event(cache: &Cache, reaction: &Reaction) -> ReactionEvent {
    let emoji = match &reaction.emoji {
        ReactionType::Unicode(emoji) => emoji.clone(),
        ReactionType::Custom { id, name, .. } => name.clone().unwrap_or_else(|| id.to_string()),
        other => other.to_string(),
    };

    ReactionEvent {
        guild: guild(cache, reaction.guild_id),
        channel: channel(cache, reaction.channel_id),
        user: reaction.user_id.map(|id| cached_user(cache, id)),
        message_id: reaction.message_id.to_string(),
        emoji,
    }
}

fn option_value(option: &CommandDataOption) -> Option<OptionValue> {
    let value = match option.resolved.as_ref()? {
        CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
        CommandDataOptionValue::Integer(n) => OptionValue::Integer(*n),
        CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(*b),
        CommandDataOptionValue::User(user, _) => OptionValue::User(user.id.to_string()),
        CommandDataOptionValue::Channel(channel) => OptionValue::Channel(channel.id.to_string()),
        CommandDataOptionValue::Role(role) => OptionValue::Role(role.id.to_string()),
        _ => return None,
    };
    Some(value)
}

pub fn slash_command_event(cache: &Cache, command: &ApplicationCommandInteraction) -> SlashCommandEvent {
    let subcommand = command
        .data
        .options
        .iter()
        .find(|option| option.kind == CommandOptionType::SubCommand);

    let options = subcommand
        .map(|sub| sub.options.as_slice())
        .unwrap_or(command.data.options.as_slice())
        .iter()
        .filter_map(|option| option_value(option).map(|value| (option.name.clone(), value)))
        .collect();

    SlashCommandEvent {
        interaction: InteractionRef {
            id: command.id.to_string(),
            token: command.token.clone(),
        },
        guild: guild(cache, command.guild_id),
        channel: channel(cache, command.channel_id),
        user: convert_user(&command.user),
        name: command.data.name.clone(),
        subcommand: subcommand.map(|sub| sub.name.clone()),
        options,
    }
}

/// `None` for component types the dispatcher does not route
pub fn component_event(cache: &Cache, component: &MessageComponentInteraction) -> Option<ComponentEvent> {
    let kind = match component.data.component_type {
        ComponentType::Button => ComponentKind::Button,
        ComponentType::SelectMenu => ComponentKind::SelectMenu,
        _ => return None,
    };

    Some(ComponentEvent {
        interaction: InteractionRef {
            id: component.id.to_string(),
            token: component.token.clone(),
        },
        guild: guild(cache, component.guild_id),
        channel: channel(cache, component.channel_id),
        user: convert_user(&component.user),
        message_id: component.message.id.to_string(),
        component_id: component.data.custom_id.clone(),
        kind,
        values: component.data.values.clone(),
    })
}
