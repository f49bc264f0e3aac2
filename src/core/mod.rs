//! # Core Module
//!
//! Shared entities, errors, configuration and reply types for the dispatcher.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;
pub mod embeds;
pub mod error;
pub mod model;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::{HandlerError, HandlerResult};
pub use model::{
    Channel, ComponentEvent, ComponentKind, Guild, InteractionRef, Message, MessageEvent,
    OptionValue, ReactionEvent, SlashCommandEvent, User,
};
pub use response::{MessageStyle, OutgoingMessage};
