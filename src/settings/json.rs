//! JSON file backed settings, one file per guild (`<dir>/<guild id>.json`)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, warn};

use super::{GuildSettings, SettingsDefaults, SettingsStore};

pub struct JsonSettingsStore {
    dir: PathBuf,
    defaults: SettingsDefaults,
    cache: DashMap<String, GuildSettings>,
}

impl JsonSettingsStore {
    pub fn new(dir: impl AsRef<Path>, defaults: SettingsDefaults) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            defaults,
            cache: DashMap::new(),
        }
    }

    fn path_for(&self, guild_id: &str) -> Option<PathBuf> {
        // Guild ids are snowflakes; anything else must not reach the filesystem
        let valid = !guild_id.is_empty()
            && guild_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{guild_id}.json")))
    }

    /// Read a guild's settings from disk, a missing file yields the empty settings
    pub fn load(&self, guild_id: &str) -> Result<GuildSettings> {
        let Some(path) = self.path_for(guild_id) else {
            anyhow::bail!("invalid guild id for settings lookup: {guild_id:?}");
        };

        if !path.exists() {
            debug!("No settings file for guild {guild_id}, using defaults");
            return Ok(GuildSettings::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let settings: GuildSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(settings)
    }

    /// Cached settings for a guild, loading them on first access
    fn guild(&self, guild_id: &str) -> GuildSettings {
        if let Some(settings) = self.cache.get(guild_id) {
            return settings.clone();
        }

        let settings = self.load(guild_id).unwrap_or_else(|e| {
            warn!("Falling back to default settings for guild {guild_id}: {e:#}");
            GuildSettings::default()
        });
        self.cache
            .entry(guild_id.to_string())
            .or_insert(settings)
            .clone()
    }
}

impl SettingsStore for JsonSettingsStore {
    fn command_symbol(&self, guild_id: &str) -> String {
        self.guild(guild_id)
            .command_symbol
            .unwrap_or_else(|| self.defaults.command_symbol.clone())
    }

    fn module_prefix(&self, guild_id: &str, module_id: &str) -> Option<String> {
        self.guild(guild_id).module_prefixes.get(module_id).cloned()
    }

    fn delete_command_messages(&self, guild_id: &str) -> bool {
        self.guild(guild_id)
            .delete_command_messages
            .unwrap_or(self.defaults.delete_command_messages)
    }
}
