use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::{Message, Reaction};
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::prelude::*;

use guild_dispatch::commands::{UnlistedAction, UnlistedCall, UnlistedCommand};
use guild_dispatch::core::{Config, HandlerResult, OutgoingMessage};
use guild_dispatch::i18n::MessageCatalog;
use guild_dispatch::module::{BotContext, BotModule};
use guild_dispatch::platform::serenity::{self as adapter, SerenityPlatform};
use guild_dispatch::settings::{JsonSettingsStore, SettingsDefaults};
use guild_dispatch::{Bot, BotEvent};

/// `!echo say <text>`: repeats the text and lets the command message go
struct SayAction;

#[async_trait]
impl UnlistedAction for SayAction {
    async fn run(&self, module: &BotModule, call: UnlistedCall<'_>) -> HandlerResult<bool> {
        let text = call.arguments.first().map(String::as_str).unwrap_or_default();
        let reply = OutgoingMessage::simple("Echo", call.author, text);
        module
            .context()
            .platform
            .send_message(&call.channel.id, reply)
            .await?;
        Ok(true)
    }
}

struct Handler {
    bot: Arc<Bot>,
    platform: Arc<SerenityPlatform>,
    /// Development guild, the only one commands are registered in when set
    guild_id: Option<String>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        let event = adapter::message_event(&ctx.cache, &msg);
        self.bot.dispatch(&BotEvent::Message(event)).await;
    }

    async fn reaction_add(&self, ctx: Context, reaction: Reaction) {
        let event = adapter::reaction_event(&ctx.cache, &reaction);
        self.bot.dispatch(&BotEvent::Reaction(event)).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let event = match interaction {
            Interaction::ApplicationCommand(command) => {
                BotEvent::SlashCommand(adapter::slash_command_event(&ctx.cache, &command))
            }
            Interaction::MessageComponent(component) => {
                match adapter::component_event(&ctx.cache, &component) {
                    Some(event) => BotEvent::Component(event),
                    None => return,
                }
            }
            _ => return,
        };
        self.bot.dispatch(&event).await;
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: bool) {
        let guild_id = guild.id.to_string();
        if self.guild_id.as_ref().is_some_and(|dev| *dev != guild_id) {
            return;
        }

        let descriptors = self.bot.generate_commands(&guild_id);
        match self.platform.register_commands(&guild_id, &descriptors).await {
            Ok(()) => info!(
                "Registered {} commands in {} ({guild_id})",
                descriptors.len(),
                guild.name
            ),
            Err(e) => error!("Failed to register commands in {} ({guild_id}): {e}", guild.name),
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        info!("Connected to {} guilds", ready.guilds.len());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting guild dispatch bot...");

    let strings = match &config.strings_path {
        Some(path) => MessageCatalog::load(path)?,
        None => MessageCatalog::new(),
    };
    let settings = JsonSettingsStore::new(&config.settings_dir, SettingsDefaults::from(&config));

    let http = Arc::new(Http::new(&config.discord_token));
    let platform = Arc::new(SerenityPlatform::connect(http).await?);

    let context = BotContext::new(platform.clone(), Arc::new(settings), Arc::new(strings));
    let mut bot = Bot::new(context);

    let echo = BotModule::new("echo", bot.context().clone()).with_name("Echo");
    echo.add_unlisted_bot_command(
        UnlistedCommand::new("say", SayAction)
            .arity(1, 1)
            .join_arguments(true)
            .help("Repeats the given text.")
            .arguments("<text>"),
    );
    bot.add_module(echo)?;

    if config.guild_id.is_none() {
        warn!("GUILD_ID not set, registering commands in every guild");
    }

    let handler = Handler {
        bot: Arc::new(bot),
        platform,
        guild_id: config.guild_id.clone(),
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Gateway intents: {intents:?}");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
