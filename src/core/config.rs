//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{Context, Result};
use std::env;

/// Runtime configuration, read from the process environment (after `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    /// Global command symbol used when a guild has no override
    pub command_symbol: String,
    /// Whether command messages are deleted when a guild has no override
    pub delete_command_messages: bool,
    pub settings_dir: String,
    pub strings_path: Option<String>,
    pub log_level: String,
    /// Development guild; commands are registered there only
    pub guild_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token =
            env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set in the environment")?;

        let delete_command_messages = match env::var("DELETE_COMMAND_MESSAGES") {
            Ok(raw) => parse_flag(&raw).with_context(|| {
                format!("DELETE_COMMAND_MESSAGES must be a boolean, got '{raw}'")
            })?,
            Err(_) => false,
        };

        Ok(Config {
            discord_token,
            command_symbol: env::var("COMMAND_SYMBOL").unwrap_or_else(|_| "!".to_string()),
            delete_command_messages,
            settings_dir: env::var("SETTINGS_DIR").unwrap_or_else(|_| "settings".to_string()),
            strings_path: env::var("STRINGS_PATH").ok().filter(|p| !p.is_empty()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            guild_id: env::var("GUILD_ID").ok().filter(|id| !id.is_empty()),
        })
    }
}

/// Accepts the usual spellings of a boolean switch
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}
