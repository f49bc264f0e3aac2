//! Embed rendering for outgoing messages
//!
//! Turns an [`OutgoingMessage`] into serenity builders, so the adapter can hand
//! them to message sends and interaction responses alike.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;

use super::response::{Button, MessageStyle, OutgoingMessage};

/// Accent color for informational replies
pub const SIMPLE_COLOR: u32 = 0x5865F2;
/// Accent color for error replies
pub const ERROR_COLOR: u32 = 0xED4245;

/// Discord allows at most 5 buttons per action row
const BUTTONS_PER_ROW: usize = 5;
/// and at most 5 rows per message
const MAX_ROWS: usize = 5;

/// Build the embed: title, description, author name, fields, accent color
pub fn message_embed(message: &OutgoingMessage) -> CreateEmbed {
    let mut embed = CreateEmbed::default();

    let color = match message.style {
        MessageStyle::Simple => SIMPLE_COLOR,
        MessageStyle::Error => ERROR_COLOR,
    };
    embed.title(&message.title);
    embed.color(color);

    if !message.description.is_empty() {
        embed.description(&message.description);
    }
    if let Some(author) = &message.author {
        embed.author(|a| a.name(author));
    }
    for field in &message.fields {
        embed.field(&field.name, &field.value, field.inline);
    }

    embed
}

/// Lay buttons out in action rows, extra buttons past the row limit are dropped
pub fn message_components(buttons: &[Button]) -> CreateComponents {
    let mut components = CreateComponents::default();

    for chunk in buttons.chunks(BUTTONS_PER_ROW).take(MAX_ROWS) {
        components.create_action_row(|row| {
            for button in chunk {
                row.create_button(|btn| {
                    btn.custom_id(&button.custom_id)
                        .label(&button.label)
                        .style(ButtonStyle::Primary)
                });
            }
            row
        });
    }

    components
}
