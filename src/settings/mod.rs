//! # Guild Settings
//!
//! Per-guild overrides for the command symbol, module prefixes and the
//! delete-command-messages switch. Lookups never fail: a guild without
//! settings falls back to the process defaults.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod json;

use std::collections::HashMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::core::Config;

pub use json::JsonSettingsStore;

/// Stored overrides for one guild, absent fields use the defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    #[serde(default)]
    pub command_symbol: Option<String>,
    #[serde(default)]
    pub delete_command_messages: Option<bool>,
    /// Module internal id -> prefix
    #[serde(default)]
    pub module_prefixes: HashMap<String, String>,
}

/// Values used when a guild has no override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDefaults {
    pub command_symbol: String,
    pub delete_command_messages: bool,
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            command_symbol: "!".to_string(),
            delete_command_messages: false,
        }
    }
}

impl From<&Config> for SettingsDefaults {
    fn from(config: &Config) -> Self {
        Self {
            command_symbol: config.command_symbol.clone(),
            delete_command_messages: config.delete_command_messages,
        }
    }
}

/// Read side of the settings collaborator
///
/// Implementations load a guild's settings on first access.
pub trait SettingsStore: Send + Sync {
    fn command_symbol(&self, guild_id: &str) -> String;

    /// Prefix override for a module, `None` when the guild never set one
    fn module_prefix(&self, guild_id: &str, module_id: &str) -> Option<String>;

    fn delete_command_messages(&self, guild_id: &str) -> bool;
}

/// Settings held only in memory, for tests and embedding
#[derive(Default)]
pub struct MemorySettingsStore {
    defaults: SettingsDefaults,
    guilds: DashMap<String, GuildSettings>,
}

impl MemorySettingsStore {
    pub fn new(defaults: SettingsDefaults) -> Self {
        Self {
            defaults,
            guilds: DashMap::new(),
        }
    }

    /// Replace the settings of a guild
    pub fn set(&self, guild_id: &str, settings: GuildSettings) {
        self.guilds.insert(guild_id.to_string(), settings);
    }
}

impl SettingsStore for MemorySettingsStore {
    fn command_symbol(&self, guild_id: &str) -> String {
        self.guilds
            .get(guild_id)
            .and_then(|s| s.command_symbol.clone())
            .unwrap_or_else(|| self.defaults.command_symbol.clone())
    }

    fn module_prefix(&self, guild_id: &str, module_id: &str) -> Option<String> {
        self.guilds
            .get(guild_id)
            .and_then(|s| s.module_prefixes.get(module_id).cloned())
    }

    fn delete_command_messages(&self, guild_id: &str) -> bool {
        self.guilds
            .get(guild_id)
            .and_then(|s| s.delete_command_messages)
            .unwrap_or(self.defaults.delete_command_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_defaults() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.command_symbol("g1"), "!");
        assert!(!store.delete_command_messages("g1"));
        assert_eq!(store.module_prefix("g1", "poll"), None);
    }

    #[test]
    fn test_memory_store_overrides() {
        let store = MemorySettingsStore::new(SettingsDefaults::default());
        store.set(
            "g1",
            GuildSettings {
                command_symbol: Some("?".into()),
                delete_command_messages: Some(true),
                module_prefixes: HashMap::from([("poll".to_string(), "vote".to_string())]),
            },
        );

        assert_eq!(store.command_symbol("g1"), "?");
        assert!(store.delete_command_messages("g1"));
        assert_eq!(store.module_prefix("g1", "poll").as_deref(), Some("vote"));

        // Other guilds are untouched
        assert_eq!(store.command_symbol("g2"), "!");
    }

    #[test]
    fn test_partial_settings_fall_back() {
        let store = MemorySettingsStore::new(SettingsDefaults {
            command_symbol: "$".into(),
            delete_command_messages: true,
        });
        store.set("g1", GuildSettings::default());

        assert_eq!(store.command_symbol("g1"), "$");
        assert!(store.delete_command_messages("g1"));
    }
}
