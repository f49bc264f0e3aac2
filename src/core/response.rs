//! Outgoing message model and Discord size limits
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Platform-neutral replies with simple/error styles, embed limits kept

use serde::Serialize;

use super::model::User;

/// Discord embed title limit
pub const TITLE_LIMIT: usize = 256;
/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;
/// Discord embed field value limit
pub const FIELD_LIMIT: usize = 1024;

/// Visual style of a reply, adapters pick colors from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageStyle {
    Simple,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
}

/// A message the core asks the platform to deliver
///
/// Rendering (embed layout, colors, component rows) is the adapter's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub style: MessageStyle,
    pub title: String,
    pub description: String,
    /// Shown as the embed author, usually the user who triggered the reply
    pub author: Option<String>,
    pub fields: Vec<EmbedField>,
    pub buttons: Vec<Button>,
}

impl OutgoingMessage {
    fn build(style: MessageStyle, title: &str, author: Option<&User>, description: &str) -> Self {
        Self {
            style,
            title: truncate(title, TITLE_LIMIT),
            description: truncate_for_embed(description),
            author: author.map(|u| u.name.clone()),
            fields: Vec::new(),
            buttons: Vec::new(),
        }
    }

    /// Plain informational reply
    pub fn simple(title: &str, author: &User, description: &str) -> Self {
        Self::build(MessageStyle::Simple, title, Some(author), description)
    }

    /// Error reply with a fixed title/description pair
    pub fn error(title: &str, author: &User, description: &str) -> Self {
        Self::build(MessageStyle::Error, title, Some(author), description)
    }

    pub fn field(mut self, name: &str, value: &str, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: truncate(name, TITLE_LIMIT),
            value: truncate(value, FIELD_LIMIT),
            inline,
        });
        self
    }

    pub fn button(mut self, custom_id: &str, label: &str) -> Self {
        self.buttons.push(Button {
            custom_id: custom_id.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.style == MessageStyle::Error
    }
}

/// Truncate text to `limit` bytes on a char boundary, adding an ellipsis if cut
pub fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }

    // Room for "..."
    let mut end = limit.saturating_sub(3);
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Truncate text to fit the embed description limit
pub fn truncate_for_embed(text: &str) -> String {
    truncate(text, EMBED_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: "1".into(),
            name: "alice".into(),
            bot: false,
        }
    }

    #[test]
    fn test_truncate_short_untouched() {
        assert_eq!(truncate("short text", 100), "short text");
    }

    #[test]
    fn test_truncate_for_embed_long() {
        let result = truncate_for_embed(&"a".repeat(5000));
        assert!(result.len() <= EMBED_LIMIT);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_utf8_safety() {
        let text = "世界".repeat(1000);
        let result = truncate(&text, 100);
        assert!(result.len() <= 100);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_simple_and_error_styles() {
        let simple = OutgoingMessage::simple("Cancel", &alice(), "done");
        assert!(!simple.is_error());
        assert_eq!(simple.author.as_deref(), Some("alice"));

        let error = OutgoingMessage::error("Cancel", &alice(), "nothing to cancel");
        assert!(error.is_error());
        assert_eq!(error.title, "Cancel");
        assert_eq!(error.description, "nothing to cancel");
    }

    #[test]
    fn test_field_value_truncated() {
        let msg = OutgoingMessage::simple("Help", &alice(), "")
            .field("Listed commands", &"x".repeat(2000), false);
        assert_eq!(msg.fields.len(), 1);
        assert!(msg.fields[0].value.len() <= FIELD_LIMIT);
    }

    #[test]
    fn test_buttons_kept_in_order() {
        let msg = OutgoingMessage::simple("Vote", &alice(), "pick one")
            .button("yes", "Yes")
            .button("no", "No");
        let ids: Vec<_> = msg.buttons.iter().map(|b| b.custom_id.as_str()).collect();
        assert_eq!(ids, vec!["yes", "no"]);
    }
}
