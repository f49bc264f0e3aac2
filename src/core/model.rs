//! Platform-neutral entities and inbound events
//!
//! The dispatcher never sees transport types directly; adapters translate
//! gateway payloads into these structs before handing them over.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A guild (tenant) the bot is a member of
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
}

/// A text channel inside a guild
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// A platform user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub bot: bool,
}

/// A fully resolved message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub author: User,
    pub content: String,
}

/// Handle needed to answer an interaction (slash command or component click)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRef {
    pub id: String,
    pub token: String,
}

/// A text message was posted
#[derive(Debug, Clone)]
pub struct MessageEvent {
    /// `None` for private channels
    pub guild: Option<Guild>,
    pub channel: Channel,
    pub message: Message,
}

/// A reaction was added to a message
///
/// Only the message id is known at this point, the dispatcher fetches the
/// full message before handing it to a task.
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub guild: Option<Guild>,
    pub channel: Channel,
    /// `None` when the platform could not resolve the reacting user
    pub user: Option<User>,
    pub message_id: String,
    pub emoji: String,
}

/// Value of a structured command option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(String),
    Channel(String),
    Role(String),
}

impl OptionValue {
    /// String view of the value, ids for entity options
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s)
            | OptionValue::User(s)
            | OptionValue::Channel(s)
            | OptionValue::Role(s) => Some(s),
            OptionValue::Integer(_) | OptionValue::Boolean(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// A structured (slash-style) command was invoked
#[derive(Debug, Clone)]
pub struct SlashCommandEvent {
    pub interaction: InteractionRef,
    pub guild: Option<Guild>,
    pub channel: Channel,
    pub user: User,
    /// Top-level command name, matched against the module prefix
    pub name: String,
    pub subcommand: Option<String>,
    pub options: HashMap<String, OptionValue>,
}

impl SlashCommandEvent {
    /// Full command path as shown in logs, e.g. `poll/create`
    pub fn command_path(&self) -> String {
        match &self.subcommand {
            Some(sub) => format!("{}/{}", self.name, sub),
            None => self.name.clone(),
        }
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }
}

/// Shape of a clickable component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Button,
    SelectMenu,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Button => write!(f, "button"),
            ComponentKind::SelectMenu => write!(f, "select menu"),
        }
    }
}

/// A component attached to a rendered message was used
#[derive(Debug, Clone)]
pub struct ComponentEvent {
    pub interaction: InteractionRef,
    pub guild: Option<Guild>,
    pub channel: Channel,
    pub user: User,
    /// Message the component is attached to
    pub message_id: String,
    pub component_id: String,
    pub kind: ComponentKind,
    /// Selected values for select menus, empty for buttons
    pub values: Vec<String>,
}
