//! Built-in `help` and `cancel` commands present in every module

use async_trait::async_trait;

use super::BotModule;
use crate::commands::{BotCommand, CommandOption, OptionKind, SlashAction, SlashCall};
use crate::core::{HandlerResult, OptionValue, OutgoingMessage, User};

/// Option of `help` naming the unlisted command to describe
pub const HELP_OPTION: &str = "command-name";

pub(super) fn register(module: &BotModule) {
    let context = module.context();
    module.add_bot_command(
        BotCommand::new("help", &context.text("command_help_desc", &[]), HelpCommand).with_option(
            CommandOption::new(
                HELP_OPTION,
                &context.text("command_help_param", &[]),
                OptionKind::String,
                false,
            ),
        ),
    );
    module.add_bot_command(BotCommand::new(
        "cancel",
        &context.text("command_cancel_desc", &[]),
        CancelCommand,
    ));
}

/// Lists the module's commands, or details one unlisted command
pub struct HelpCommand;

#[async_trait]
impl SlashAction for HelpCommand {
    async fn run(&self, module: &BotModule, call: SlashCall<'_>) -> HandlerResult<()> {
        let context = module.context();
        let guild_id = &call.guild.id;

        let requested = call.event.option(HELP_OPTION).and_then(OptionValue::as_str);
        let (reply, ephemeral) = match requested {
            None => (help_listing(module, guild_id, call.author), false),
            Some(name) => match module.get_unlisted_bot_command(name) {
                Some(command) => {
                    let symbol = context.settings.command_symbol(guild_id);
                    let usage = context.text(
                        "command_help_command_desc",
                        &[&command.arguments_description(guild_id, &symbol)],
                    );
                    let description = if command.help_text().is_empty() {
                        usage
                    } else {
                        format!("{usage}\n{}", command.help_text())
                    };
                    let title = context.text("command_help_command_title", &[command.id()]);
                    (OutgoingMessage::simple(&title, call.author, &description), false)
                }
                None => {
                    let title = context.text("command_help_command_title", &[name]);
                    let description = context.text("command_help_command_not_found_error", &[name]);
                    (OutgoingMessage::error(&title, call.author, &description), true)
                }
            },
        };

        context
            .platform
            .reply(&call.event.interaction, reply, ephemeral)
            .await
    }
}

fn help_listing(module: &BotModule, guild_id: &str, author: &User) -> OutgoingMessage {
    let context = module.context();
    let prefix = module.module_prefix(guild_id);
    let symbol = context.settings.command_symbol(guild_id);
    let title = context.text("command_help_list_title", &[module.name()]);
    let mut reply = OutgoingMessage::simple(&title, author, "");

    let listed: String = module
        .bot_commands()
        .iter()
        .map(|command| format!("`/{prefix} {}` {}\n", command.id(), command.description()))
        .collect();
    if !listed.is_empty() {
        reply = reply.field(&context.text("command_help_listed_commands", &[]), &listed, false);
    }

    let unlisted: String = module
        .unlisted_bot_commands()
        .iter()
        .map(|command| {
            format!(
                "`{}` {}\n",
                command.arguments_description(guild_id, &symbol),
                command.help_text()
            )
        })
        .collect();
    if !unlisted.is_empty() {
        reply = reply.field(&context.text("command_help_unlisted_commands", &[]), &unlisted, false);
    }

    reply
}

/// Drops the caller's task, or tells them there is none
pub struct CancelCommand;

#[async_trait]
impl SlashAction for CancelCommand {
    async fn run(&self, module: &BotModule, call: SlashCall<'_>) -> HandlerResult<()> {
        let context = module.context();
        let title = context.text("command_cancel_title", &[]);

        let (reply, ephemeral) = if module.remove_task(&call.guild.id, &call.author.id) {
            let description = context.text("command_cancel_info", &[]);
            (OutgoingMessage::simple(&title, call.author, &description), false)
        } else {
            let description = context.text("command_cancel_no_task_error", &[]);
            (OutgoingMessage::error(&title, call.author, &description), true)
        };

        context
            .platform
            .reply(&call.event.interaction, reply, ephemeral)
            .await
    }
}
